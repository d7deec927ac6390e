use crate::middlewares::{authorization, require_permission};
use crate::modules::permission::schema::Permission;
use crate::modules::user::handle::*;
use crate::modules::user::schema::UserRole;
use actix_web::middleware::from_fn;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/users").service(get_profile).service(update_profile).service(
            scope("")
                .wrap(from_fn(require_permission(Permission::UsersManage)))
                .wrap(from_fn(authorization(vec![UserRole::SuperAdmin, UserRole::Admin])))
                .service(list_users)
                .service(update_user),
        ),
    );
}
