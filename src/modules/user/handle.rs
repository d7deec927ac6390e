use actix_web::{get, patch, web};
use uuid::Uuid;

use crate::api::{error, success};
use crate::modules::auth::{service::AuthService, session::SessionContext};
use crate::modules::user::{model, service::UserService};
use crate::utils::{ValidatedJson, ValidatedQuery};

#[get("/profile")]
pub async fn get_profile(
    session: SessionContext,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user = model::UserResponse::from(session.profile);
    Ok(success::Success::ok(Some(user)).message("Profile retrieved successfully"))
}

#[patch("/profile")]
pub async fn update_profile(
    auth_service: web::Data<AuthService>,
    session: SessionContext,
    body: ValidatedJson<model::UpdateProfileModel>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user = auth_service.update_profile(&session, body.0).await?;
    Ok(success::Success::ok(Some(model::UserResponse::from(user)))
        .message("Profile updated successfully"))
}

#[get("")]
pub async fn list_users(
    user_service: web::Data<UserService>,
    session: SessionContext,
    query: ValidatedQuery<model::UserListQuery>,
) -> Result<success::Success<Vec<model::UserResponse>>, error::Error> {
    let users = user_service.list(&session.filter(), query.0).await?;
    let users = users.into_iter().map(model::UserResponse::from).collect();
    Ok(success::Success::ok(Some(users)).message("Users retrieved successfully"))
}

#[patch("/{id:[0-9a-fA-F-]{36}}")]
pub async fn update_user(
    user_service: web::Data<UserService>,
    session: SessionContext,
    user_id: web::Path<Uuid>,
    body: ValidatedJson<model::AdminUpdateUserModel>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user_id = user_id.into_inner();
    let target = user_service.get_by_id(user_id).await?;
    if !session.scope.allows(target.organization_id) {
        return Err(error::Error::not_found("User not found"));
    }

    let user = user_service.admin_update(session.role(), user_id, body.0).await?;
    Ok(success::Success::ok(Some(model::UserResponse::from(user)))
        .message("User updated successfully"))
}
