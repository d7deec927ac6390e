use crate::middlewares::authorization;
use crate::modules::permission::handle::*;
use crate::modules::user::schema::UserRole;
use actix_web::middleware::from_fn;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/role-permissions")
            .wrap(from_fn(authorization(vec![UserRole::SuperAdmin, UserRole::Admin])))
            .service(get_role_permissions)
            .service(update_role_permissions),
    );
}
