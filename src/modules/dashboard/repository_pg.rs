use crate::{
    api::error,
    modules::{
        dashboard::{
            repository::DashboardRepository,
            schema::{ActionItemCounts, InspectionCounts},
        },
        organization::scope::ScopeFilter,
    },
};

#[derive(Clone)]
pub struct DashboardRepositoryPg {
    pool: sqlx::PgPool,
}

impl DashboardRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DashboardRepository for DashboardRepositoryPg {
    async fn inspection_counts(
        &self,
        scope: &ScopeFilter,
    ) -> Result<InspectionCounts, error::SystemError> {
        let counts = sqlx::query_as::<_, InspectionCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'draft') AS draft,
                COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved,
                COUNT(*) FILTER (WHERE completed_at >= NOW() - INTERVAL '30 days') AS completed_last_30_days
            FROM inspections
            WHERE (($1::uuid[] IS NULL AND $2::uuid IS NULL)
                OR organization_id = ANY($1) OR inspector_id = $2)
            "#,
        )
        .bind(&scope.orgs)
        .bind(scope.owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }

    async fn action_item_counts(
        &self,
        scope: &ScopeFilter,
    ) -> Result<ActionItemCounts, error::SystemError> {
        let counts = sqlx::query_as::<_, ActionItemCounts>(
            r#"
            SELECT
                COUNT(*) AS open,
                COUNT(*) FILTER (WHERE a.priority = 'critical') AS critical
            FROM action_items a
            JOIN inspections i ON i.id = a.inspection_id
            WHERE a.status <> 'resolved'
            AND (($1::uuid[] IS NULL AND $2::uuid IS NULL)
                OR i.organization_id = ANY($1) OR i.inspector_id = $2)
            "#,
        )
        .bind(&scope.orgs)
        .bind(scope.owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }

    async fn active_template_count(&self, scope: &ScopeFilter) -> Result<i64, error::SystemError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM checklist_templates
            WHERE is_active
            AND (($1::uuid[] IS NULL AND $2::uuid IS NULL)
                OR organization_id = ANY($1) OR created_by = $2)
            "#,
        )
        .bind(&scope.orgs)
        .bind(scope.owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
