use uuid::Uuid;

use crate::{
    api::error,
    modules::organization::scope::ScopeFilter,
    modules::user::model::{InsertUser, UpdateUser},
    modules::user::schema::{UserEntity, UserRole},
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;

    /// Inserts the profile, or refreshes its email if it already exists.
    async fn upsert(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError>;

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError>;

    async fn list(
        &self,
        scope: &ScopeFilter,
        role: Option<UserRole>,
        limit: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError>;
}
