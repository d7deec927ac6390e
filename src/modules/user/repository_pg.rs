use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        organization::scope::ScopeFilter,
        user::{
            model::{InsertUser, UpdateUser},
            repository::UserRepository,
            schema::{UserEntity, UserRole},
        },
    },
};

#[derive(Clone)]
pub struct UserRepositoryPg {
    pool: sqlx::PgPool,
}

impl UserRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn upsert(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (id, email, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
        UPDATE users
        SET
            full_name       = COALESCE($2, full_name),
            role            = COALESCE($3, role),
            organization_id = CASE WHEN $4::boolean THEN $5 ELSE organization_id END,
            updated_at      = NOW()
        WHERE id = $1
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(&user.full_name) // $2: Option<String>
        .bind(user.role) // $3: Option<UserRole>
        .bind(user.organization_id.is_some()) // $4: was organization_id provided?
        .bind(user.organization_id.flatten()) // $5: Option<Uuid>
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        Ok(user)
    }

    async fn list(
        &self,
        scope: &ScopeFilter,
        role: Option<UserRole>,
        limit: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT * FROM users
            WHERE (($1::uuid[] IS NULL AND $2::uuid IS NULL)
                OR organization_id = ANY($1) OR id = $2)
            AND ($3::user_role IS NULL OR role = $3)
            ORDER BY email
            LIMIT $4
            "#,
        )
        .bind(&scope.orgs)
        .bind(scope.owner)
        .bind(role)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
