use crate::middlewares::{authorization, require_permission};
use crate::modules::organization::handle::*;
use crate::modules::permission::schema::Permission;
use crate::modules::user::schema::UserRole;
use actix_web::middleware::from_fn;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/organizations")
            .service(list_organizations)
            .service(get_organization)
            .service(
                scope("")
                    .wrap(from_fn(require_permission(Permission::OrganizationsManage)))
                    .wrap(from_fn(authorization(vec![UserRole::SuperAdmin, UserRole::Admin])))
                    .service(create_organization)
                    .service(update_organization)
                    .service(delete_organization),
            ),
    );
}
