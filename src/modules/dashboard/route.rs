use crate::middlewares::require_permission;
use crate::modules::dashboard::handle::*;
use crate::modules::permission::schema::Permission;
use actix_web::middleware::from_fn;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/dashboard")
            .wrap(from_fn(require_permission(Permission::ReportsRead)))
            .service(get_stats),
    );
}
