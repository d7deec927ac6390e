use crate::{
    api::error,
    modules::{
        permission::{repository::PermissionRepository, schema::RolePermissionEntity},
        user::schema::UserRole,
    },
};

#[derive(Clone)]
pub struct PermissionRepositoryPg {
    pool: sqlx::PgPool,
}

impl PermissionRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PermissionRepository for PermissionRepositoryPg {
    async fn find_all(&self) -> Result<Vec<RolePermissionEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, RolePermissionEntity>(
            "SELECT * FROM role_permissions ORDER BY role, permission",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(
        &self,
        role: UserRole,
        permission: &str,
    ) -> Result<Option<RolePermissionEntity>, error::SystemError> {
        let row = sqlx::query_as::<_, RolePermissionEntity>(
            "SELECT * FROM role_permissions WHERE role = $1 AND permission = $2",
        )
        .bind(role)
        .bind(permission)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_many(
        &self,
        toggles: &[(UserRole, &'static str, bool)],
    ) -> Result<(), error::SystemError> {
        let mut tx = self.pool.begin().await?;
        for (role, permission, enabled) in toggles {
            sqlx::query(
                r#"
                INSERT INTO role_permissions (role, permission, enabled)
                VALUES ($1, $2, $3)
                ON CONFLICT (role, permission)
                DO UPDATE SET enabled = EXCLUDED.enabled, updated_at = NOW()
                "#,
            )
            .bind(*role)
            .bind(*permission)
            .bind(*enabled)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
