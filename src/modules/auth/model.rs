use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::{
    organization::scope::OrgScope, permission::schema::Permission, user::model::UserResponse,
};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginQuery {
    #[validate(length(min = 2, max = 32, message = "Unknown provider"))]
    pub provider: String,
    #[validate(url(message = "redirect_to must be a URL"))]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub scope: OrgScope,
    pub permissions: Vec<Permission>,
    pub expires_at: u64,
}
