use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::user::schema::{UserEntity, UserRole};
use crate::utils::double_option;

#[derive(Deserialize, Validate)]
pub struct UpdateProfileModel {
    #[validate(length(min = 1, max = 120, message = "Full name must be 1-120 characters"))]
    pub full_name: String,
}

#[derive(Deserialize, Validate)]
pub struct AdminUpdateUserModel {
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "double_option")]
    pub organization_id: Option<Option<Uuid>>,
}

#[derive(Deserialize, Validate)]
pub struct UserListQuery {
    pub role: Option<UserRole>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

pub struct InsertUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

pub struct UpdateUser {
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub organization_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub organization_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            email: entity.email,
            full_name: entity.full_name,
            role: entity.role,
            organization_id: entity.organization_id,
            created_at: entity.created_at,
        }
    }
}
