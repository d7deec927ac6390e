use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        checklist::{
            model::{FieldModel, NewTemplate, TemplateDetail, UpdateTemplateModel},
            repository::ChecklistRepository,
            schema::{ChecklistFieldEntity, ChecklistTemplateEntity},
        },
        organization::scope::ScopeFilter,
    },
};

#[derive(Clone)]
pub struct ChecklistRepositoryPg {
    pool: sqlx::PgPool,
}

impl ChecklistRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_fields(
    conn: &mut PgConnection,
    template_id: &Uuid,
    fields: &[FieldModel],
) -> Result<Vec<ChecklistFieldEntity>, error::SystemError> {
    let mut inserted = Vec::with_capacity(fields.len());
    for (position, field) in fields.iter().enumerate() {
        let row = sqlx::query_as::<_, ChecklistFieldEntity>(
            r#"
            INSERT INTO checklist_fields (id, template_id, label, field_type, required, options, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(template_id)
        .bind(field.label.trim())
        .bind(field.field_type)
        .bind(field.required)
        .bind(&field.options)
        .bind(position as i32)
        .fetch_one(&mut *conn)
        .await?;
        inserted.push(row);
    }
    Ok(inserted)
}

#[async_trait::async_trait]
impl ChecklistRepository for ChecklistRepositoryPg {
    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<ChecklistTemplateEntity>, error::SystemError> {
        let template = sqlx::query_as::<_, ChecklistTemplateEntity>(
            "SELECT * FROM checklist_templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(template)
    }

    async fn list(
        &self,
        scope: &ScopeFilter,
        category: Option<&str>,
        active: Option<bool>,
    ) -> Result<Vec<ChecklistTemplateEntity>, error::SystemError> {
        let templates = sqlx::query_as::<_, ChecklistTemplateEntity>(
            r#"
            SELECT * FROM checklist_templates
            WHERE (($1::uuid[] IS NULL AND $2::uuid IS NULL)
                OR organization_id = ANY($1) OR created_by = $2)
            AND ($3::text IS NULL OR category = $3)
            AND ($4::boolean IS NULL OR is_active = $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(&scope.orgs)
        .bind(scope.owner)
        .bind(category)
        .bind(active)
        .fetch_all(&self.pool)
        .await?;
        Ok(templates)
    }

    async fn create(
        &self,
        template: &NewTemplate,
        fields: &[FieldModel],
    ) -> Result<TemplateDetail, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, ChecklistTemplateEntity>(
            r#"
            INSERT INTO checklist_templates (id, name, description, category, organization_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&template.name)
        .bind(&template.description)
        .bind(&template.category)
        .bind(template.organization_id)
        .bind(template.created_by)
        .fetch_one(&mut *tx)
        .await?;

        let fields = insert_fields(&mut tx, &created.id, fields).await?;
        tx.commit().await?;

        Ok(TemplateDetail { template: created, fields })
    }

    async fn update(
        &self,
        id: &Uuid,
        model: &UpdateTemplateModel,
    ) -> Result<ChecklistTemplateEntity, error::SystemError> {
        sqlx::query_as::<_, ChecklistTemplateEntity>(
            r#"
            UPDATE checklist_templates
            SET
                name        = $2,
                description = $3,
                category    = $4,
                is_active   = COALESCE($5, is_active),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(model.name.trim())
        .bind(&model.description)
        .bind(&model.category)
        .bind(model.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Checklist template not found"))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM checklist_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }

    async fn find_fields(
        &self,
        template_id: &Uuid,
    ) -> Result<Vec<ChecklistFieldEntity>, error::SystemError> {
        let fields = sqlx::query_as::<_, ChecklistFieldEntity>(
            "SELECT * FROM checklist_fields WHERE template_id = $1 ORDER BY position",
        )
        .bind(template_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(fields)
    }

    async fn replace_fields(
        &self,
        template_id: &Uuid,
        fields: &[FieldModel],
    ) -> Result<Vec<ChecklistFieldEntity>, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM checklist_fields WHERE template_id = $1")
            .bind(template_id)
            .execute(&mut *tx)
            .await?;
        let fields = insert_fields(&mut tx, template_id, fields).await?;

        sqlx::query("UPDATE checklist_templates SET updated_at = NOW() WHERE id = $1")
            .bind(template_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(fields)
    }

    async fn duplicate(
        &self,
        id: &Uuid,
        created_by: &Uuid,
    ) -> Result<TemplateDetail, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let copy = sqlx::query_as::<_, ChecklistTemplateEntity>(
            r#"
            INSERT INTO checklist_templates (id, name, description, category, organization_id, created_by, is_active)
            SELECT $2, name || ' (Copy)', description, category, organization_id, $3, is_active
            FROM checklist_templates WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Uuid::now_v7())
        .bind(created_by)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Checklist template not found"))?;

        let mut fields = sqlx::query_as::<_, ChecklistFieldEntity>(
            r#"
            INSERT INTO checklist_fields (id, template_id, label, field_type, required, options, position)
            SELECT gen_random_uuid(), $2, label, field_type, required, options, position
            FROM checklist_fields WHERE template_id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(copy.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        fields.sort_by_key(|f| f.position);
        Ok(TemplateDetail { template: copy, fields })
    }
}
