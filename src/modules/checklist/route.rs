use crate::middlewares::require_permission;
use crate::modules::checklist::handle::*;
use crate::modules::permission::schema::Permission;
use actix_web::middleware::from_fn;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/checklist")
            .service(
                scope("/generate")
                    .wrap(from_fn(require_permission(Permission::ChecklistsWrite)))
                    .wrap(from_fn(require_permission(Permission::AiUse)))
                    .service(generate_checklist),
            )
            .service(
                scope("/checklist-templates")
                    .wrap(from_fn(require_permission(Permission::ChecklistsRead)))
                    .service(list_templates)
                    .service(get_template)
                    .service(get_fields)
                    .service(export_template)
                    .service(
                        scope("")
                            .wrap(from_fn(require_permission(Permission::ChecklistsWrite)))
                            .service(create_template)
                            .service(update_template)
                            .service(delete_template)
                            .service(duplicate_template)
                            .service(replace_fields),
                    ),
            ),
    );
}
