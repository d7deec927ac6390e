use crate::{
    api::error,
    modules::{permission::schema::RolePermissionEntity, user::schema::UserRole},
};

#[async_trait::async_trait]
pub trait PermissionRepository {
    async fn find_all(&self) -> Result<Vec<RolePermissionEntity>, error::SystemError>;

    async fn find(
        &self,
        role: UserRole,
        permission: &str,
    ) -> Result<Option<RolePermissionEntity>, error::SystemError>;

    /// Upserts all toggles in one transaction.
    async fn upsert_many(
        &self,
        toggles: &[(UserRole, &'static str, bool)],
    ) -> Result<(), error::SystemError>;
}
