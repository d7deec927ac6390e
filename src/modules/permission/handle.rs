use actix_web::{get, post, web};

use crate::{
    api::{error, success},
    modules::permission::{
        model::{RolePermissionResponse, UpdatePermissionsModel},
        service::PermissionService,
    },
    utils::ValidatedJson,
};

#[get("")]
pub async fn get_role_permissions(
    permission_service: web::Data<PermissionService>,
) -> Result<success::Success<Vec<RolePermissionResponse>>, error::Error> {
    let matrix = permission_service.matrix().await?;
    Ok(success::Success::ok(Some(matrix)).message("Role permissions retrieved successfully"))
}

#[post("")]
pub async fn update_role_permissions(
    permission_service: web::Data<PermissionService>,
    body: ValidatedJson<UpdatePermissionsModel>,
) -> Result<success::Success<Vec<RolePermissionResponse>>, error::Error> {
    let matrix = permission_service.update(body.0).await?;
    Ok(success::Success::ok(Some(matrix)).message("Role permissions updated successfully"))
}
