use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        inspection::{
            model::{
                CreateActionItemModel, CreateItemModel, InspectionPatch, NewInspection, NewMedia,
                UpdateActionItemModel,
            },
            repository::InspectionRepository,
            schema::{
                ActionItemEntity, InspectionEntity, InspectionItemEntity, InspectionMediaEntity,
                InspectionStatus,
            },
        },
        organization::scope::ScopeFilter,
    },
};

#[derive(Clone)]
pub struct InspectionRepositoryPg {
    pool: sqlx::PgPool,
}

impl InspectionRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl InspectionRepository for InspectionRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<InspectionEntity>, error::SystemError> {
        let inspection =
            sqlx::query_as::<_, InspectionEntity>("SELECT * FROM inspections WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(inspection)
    }

    async fn list(
        &self,
        scope: &ScopeFilter,
        status: Option<InspectionStatus>,
        template_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<InspectionEntity>, error::SystemError> {
        let inspections = sqlx::query_as::<_, InspectionEntity>(
            r#"
            SELECT * FROM inspections
            WHERE (($1::uuid[] IS NULL AND $2::uuid IS NULL)
                OR organization_id = ANY($1) OR inspector_id = $2)
            AND ($3::inspection_status IS NULL OR status = $3)
            AND ($4::uuid IS NULL OR template_id = $4)
            ORDER BY created_at DESC
            LIMIT $5
            "#,
        )
        .bind(&scope.orgs)
        .bind(scope.owner)
        .bind(status)
        .bind(template_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(inspections)
    }

    async fn create(
        &self,
        inspection: &NewInspection,
    ) -> Result<InspectionEntity, error::SystemError> {
        let inspection = sqlx::query_as::<_, InspectionEntity>(
            r#"
            INSERT INTO inspections
                (id, title, description, location, template_id, organization_id, inspector_id, scheduled_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&inspection.title)
        .bind(&inspection.description)
        .bind(&inspection.location)
        .bind(inspection.template_id)
        .bind(inspection.organization_id)
        .bind(inspection.inspector_id)
        .bind(inspection.scheduled_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inspection)
    }

    async fn update(
        &self,
        id: &Uuid,
        patch: &InspectionPatch,
    ) -> Result<InspectionEntity, error::SystemError> {
        sqlx::query_as::<_, InspectionEntity>(
            r#"
        UPDATE inspections
        SET
            title        = COALESCE($2, title),
            description  = CASE WHEN $3::boolean THEN $4 ELSE description END,
            location     = CASE WHEN $5::boolean THEN $6 ELSE location END,
            scheduled_at = CASE WHEN $7::boolean THEN $8 ELSE scheduled_at END,
            status       = COALESCE($9, status),
            completed_at = CASE WHEN $10::boolean THEN $11 ELSE completed_at END,
            updated_at   = NOW()
        WHERE id = $1
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(patch.description.is_some())
        .bind(patch.description.clone().flatten())
        .bind(patch.location.is_some())
        .bind(patch.location.clone().flatten())
        .bind(patch.scheduled_at.is_some())
        .bind(patch.scheduled_at.flatten())
        .bind(patch.status)
        .bind(patch.completed_at.is_some())
        .bind(patch.completed_at.flatten())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Inspection not found"))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM inspections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }

    async fn set_signature(
        &self,
        id: &Uuid,
        signature: &str,
    ) -> Result<InspectionEntity, error::SystemError> {
        sqlx::query_as::<_, InspectionEntity>(
            "UPDATE inspections SET signature = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(signature)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Inspection not found"))
    }

    async fn find_items(
        &self,
        inspection_id: &Uuid,
    ) -> Result<Vec<InspectionItemEntity>, error::SystemError> {
        let items = sqlx::query_as::<_, InspectionItemEntity>(
            "SELECT * FROM inspection_items WHERE inspection_id = $1 ORDER BY created_at",
        )
        .bind(inspection_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn insert_items(
        &self,
        inspection_id: &Uuid,
        items: &[CreateItemModel],
    ) -> Result<Vec<InspectionItemEntity>, error::SystemError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(items.len());

        for item in items {
            let row = sqlx::query_as::<_, InspectionItemEntity>(
                r#"
                INSERT INTO inspection_items (id, inspection_id, field_id, label, value, notes, passed)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(inspection_id)
            .bind(item.field_id)
            .bind(item.label.trim())
            .bind(&item.value)
            .bind(&item.notes)
            .bind(item.passed)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn find_action_items(
        &self,
        inspection_id: &Uuid,
    ) -> Result<Vec<ActionItemEntity>, error::SystemError> {
        let items = sqlx::query_as::<_, ActionItemEntity>(
            "SELECT * FROM action_items WHERE inspection_id = $1 ORDER BY created_at",
        )
        .bind(inspection_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn create_action_item(
        &self,
        inspection_id: &Uuid,
        item: &CreateActionItemModel,
    ) -> Result<ActionItemEntity, error::SystemError> {
        let item = sqlx::query_as::<_, ActionItemEntity>(
            r#"
            INSERT INTO action_items (id, inspection_id, title, description, priority, assigned_to, due_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(inspection_id)
        .bind(item.title.trim())
        .bind(&item.description)
        .bind(item.priority)
        .bind(item.assigned_to)
        .bind(item.due_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    async fn update_action_item(
        &self,
        inspection_id: &Uuid,
        id: &Uuid,
        item: &UpdateActionItemModel,
    ) -> Result<ActionItemEntity, error::SystemError> {
        sqlx::query_as::<_, ActionItemEntity>(
            r#"
        UPDATE action_items
        SET
            title       = COALESCE($3, title),
            description = CASE WHEN $4::boolean THEN $5 ELSE description END,
            priority    = COALESCE($6, priority),
            status      = COALESCE($7, status),
            assigned_to = CASE WHEN $8::boolean THEN $9 ELSE assigned_to END,
            due_date    = CASE WHEN $10::boolean THEN $11 ELSE due_date END,
            updated_at  = NOW()
        WHERE id = $1 AND inspection_id = $2
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(inspection_id)
        .bind(&item.title)
        .bind(item.description.is_some())
        .bind(item.description.clone().flatten())
        .bind(item.priority)
        .bind(item.status)
        .bind(item.assigned_to.is_some())
        .bind(item.assigned_to.flatten())
        .bind(item.due_date.is_some())
        .bind(item.due_date.flatten())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Action item not found"))
    }

    async fn delete_action_item(
        &self,
        inspection_id: &Uuid,
        id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM action_items WHERE id = $1 AND inspection_id = $2")
            .bind(id)
            .bind(inspection_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }

    async fn find_media(
        &self,
        inspection_id: &Uuid,
    ) -> Result<Vec<InspectionMediaEntity>, error::SystemError> {
        let media = sqlx::query_as::<_, InspectionMediaEntity>(
            "SELECT * FROM inspection_media WHERE inspection_id = $1 ORDER BY created_at",
        )
        .bind(inspection_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(media)
    }

    async fn insert_media(
        &self,
        media: &NewMedia,
    ) -> Result<InspectionMediaEntity, error::SystemError> {
        let media = sqlx::query_as::<_, InspectionMediaEntity>(
            r#"
            INSERT INTO inspection_media
                (id, inspection_id, media_type, file_name, mime_type, data_uri, size_bytes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(media.inspection_id)
        .bind(media.media_type)
        .bind(&media.file_name)
        .bind(&media.mime_type)
        .bind(&media.data_uri)
        .bind(media.size_bytes)
        .fetch_one(&self.pool)
        .await?;
        Ok(media)
    }

    async fn delete_media(
        &self,
        inspection_id: &Uuid,
        id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM inspection_media WHERE id = $1 AND inspection_id = $2")
            .bind(id)
            .bind(inspection_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}
