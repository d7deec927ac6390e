use crate::middlewares::require_permission;
use crate::modules::inspection::handle::*;
use crate::modules::permission::schema::Permission;
use actix_web::middleware::from_fn;
use actix_web::{
    guard,
    web::{self, ServiceConfig, scope},
};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/inspections")
            .wrap(from_fn(require_permission(Permission::InspectionsRead)))
            .service(list_inspections)
            .service(get_inspection)
            .service(list_items)
            .service(list_action_items)
            .service(list_media)
            .service(
                web::resource("/{id}")
                    .guard(guard::Delete())
                    .wrap(from_fn(require_permission(Permission::InspectionsDelete)))
                    .route(web::delete().to(delete_inspection)),
            )
            .service(
                scope("")
                    .wrap(from_fn(require_permission(Permission::InspectionsWrite)))
                    .service(create_inspection)
                    .service(update_inspection)
                    .service(add_items)
                    .service(create_action_item)
                    .service(update_action_item)
                    .service(delete_action_item)
                    .service(upload_media)
                    .service(delete_media)
                    .service(sign_inspection),
            ),
    );
}
