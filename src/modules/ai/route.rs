use crate::middlewares::{authorization, require_permission};
use crate::modules::ai::handle::*;
use crate::modules::permission::schema::Permission;
use crate::modules::user::schema::UserRole;
use actix_web::middleware::from_fn;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/ai")
            .wrap(from_fn(require_permission(Permission::AiUse)))
            .service(analyze_inspection)
            .service(
                scope("/assistants")
                    .service(list_assistants)
                    .service(get_assistant)
                    .service(
                        scope("")
                            .wrap(from_fn(authorization(vec![
                                UserRole::SuperAdmin,
                                UserRole::Admin,
                            ])))
                            .service(create_assistant)
                            .service(update_assistant)
                            .service(delete_assistant),
                    ),
            ),
    );
}
