use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        ai::{
            model::{NewAssistant, UpdateAssistantModel},
            schema::AiAssistantEntity,
        },
        organization::scope::ScopeFilter,
    },
};

#[async_trait::async_trait]
pub trait AssistantRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<AiAssistantEntity>, error::SystemError>;

    async fn list(&self, scope: &ScopeFilter) -> Result<Vec<AiAssistantEntity>, error::SystemError>;

    async fn create(
        &self,
        assistant: &NewAssistant,
    ) -> Result<AiAssistantEntity, error::SystemError>;

    async fn update(
        &self,
        id: &Uuid,
        model: &UpdateAssistantModel,
    ) -> Result<AiAssistantEntity, error::SystemError>;

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;
}
