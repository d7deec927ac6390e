use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        ai::{
            model::{NewAssistant, UpdateAssistantModel},
            repository::AssistantRepository,
            schema::AiAssistantEntity,
        },
        organization::scope::ScopeFilter,
    },
};

#[derive(Clone)]
pub struct AssistantRepositoryPg {
    pool: sqlx::PgPool,
}

impl AssistantRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AssistantRepository for AssistantRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<AiAssistantEntity>, error::SystemError> {
        let assistant =
            sqlx::query_as::<_, AiAssistantEntity>("SELECT * FROM ai_assistants WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(assistant)
    }

    async fn list(
        &self,
        scope: &ScopeFilter,
    ) -> Result<Vec<AiAssistantEntity>, error::SystemError> {
        let assistants = sqlx::query_as::<_, AiAssistantEntity>(
            r#"
            SELECT * FROM ai_assistants
            WHERE organization_id IS NULL
            OR ($1::uuid[] IS NULL AND $2::uuid IS NULL)
            OR organization_id = ANY($1) OR created_by = $2
            ORDER BY name
            "#,
        )
        .bind(&scope.orgs)
        .bind(scope.owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(assistants)
    }

    async fn create(
        &self,
        assistant: &NewAssistant,
    ) -> Result<AiAssistantEntity, error::SystemError> {
        let assistant = sqlx::query_as::<_, AiAssistantEntity>(
            r#"
            INSERT INTO ai_assistants (id, name, description, system_prompt, model, organization_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&assistant.name)
        .bind(&assistant.description)
        .bind(&assistant.system_prompt)
        .bind(&assistant.model)
        .bind(assistant.organization_id)
        .bind(assistant.created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(assistant)
    }

    async fn update(
        &self,
        id: &Uuid,
        model: &UpdateAssistantModel,
    ) -> Result<AiAssistantEntity, error::SystemError> {
        sqlx::query_as::<_, AiAssistantEntity>(
            r#"
        UPDATE ai_assistants
        SET
            name          = COALESCE($2, name),
            description   = CASE WHEN $3::boolean THEN $4 ELSE description END,
            system_prompt = COALESCE($5, system_prompt),
            model         = COALESCE($6, model),
            is_active     = COALESCE($7, is_active),
            updated_at    = NOW()
        WHERE id = $1
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(&model.name)
        .bind(model.description.is_some())
        .bind(model.description.clone().flatten())
        .bind(&model.system_prompt)
        .bind(&model.model)
        .bind(model.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Assistant not found"))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM ai_assistants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}
