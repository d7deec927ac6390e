use uuid::Uuid;

use crate::{
    api::error,
    modules::organization::{
        model::NewOrganization, repository::OrganizationRepository, schema::OrganizationEntity,
    },
};

#[derive(Clone)]
pub struct OrganizationRepositoryPg {
    pool: sqlx::PgPool,
}

impl OrganizationRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OrganizationRepository for OrganizationRepositoryPg {
    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<OrganizationEntity>, error::SystemError> {
        let org = sqlx::query_as::<_, OrganizationEntity>(
            "SELECT * FROM organizations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(org)
    }

    async fn find_descendant_ids(&self, id: &Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            WITH RECURSIVE tree AS (
                SELECT id FROM organizations WHERE parent_id = $1
                UNION
                SELECT o.id FROM organizations o JOIN tree t ON o.parent_id = t.id
            )
            SELECT id FROM tree
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn list(
        &self,
        ids: Option<&[Uuid]>,
    ) -> Result<Vec<OrganizationEntity>, error::SystemError> {
        let orgs = sqlx::query_as::<_, OrganizationEntity>(
            r#"
            SELECT * FROM organizations
            WHERE ($1::uuid[] IS NULL OR id = ANY($1))
            ORDER BY org_type, name
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(orgs)
    }

    async fn create(
        &self,
        org: &NewOrganization,
    ) -> Result<OrganizationEntity, error::SystemError> {
        let org = sqlx::query_as::<_, OrganizationEntity>(
            r#"
            INSERT INTO organizations (id, name, org_type, parent_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&org.name)
        .bind(org.org_type)
        .bind(org.parent_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(org)
    }

    async fn rename(
        &self,
        id: &Uuid,
        name: &str,
    ) -> Result<OrganizationEntity, error::SystemError> {
        sqlx::query_as::<_, OrganizationEntity>(
            "UPDATE organizations SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Organization not found"))
    }

    async fn count_children(&self, id: &Uuid) -> Result<i64, error::SystemError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM organizations WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}
