use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        checklist::{
            model::{FieldModel, NewTemplate, TemplateDetail, UpdateTemplateModel},
            schema::{ChecklistFieldEntity, ChecklistTemplateEntity},
        },
        organization::scope::ScopeFilter,
    },
};

#[async_trait::async_trait]
pub trait ChecklistRepository {
    async fn find_by_id(&self, id: &Uuid)
    -> Result<Option<ChecklistTemplateEntity>, error::SystemError>;

    async fn list(
        &self,
        scope: &ScopeFilter,
        category: Option<&str>,
        active: Option<bool>,
    ) -> Result<Vec<ChecklistTemplateEntity>, error::SystemError>;

    /// Inserts the template and its fields in one transaction.
    async fn create(
        &self,
        template: &NewTemplate,
        fields: &[FieldModel],
    ) -> Result<TemplateDetail, error::SystemError>;

    async fn update(
        &self,
        id: &Uuid,
        model: &UpdateTemplateModel,
    ) -> Result<ChecklistTemplateEntity, error::SystemError>;

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    async fn find_fields(&self, template_id: &Uuid)
    -> Result<Vec<ChecklistFieldEntity>, error::SystemError>;

    /// Drops every field of the template and inserts `fields` at positions 0..n.
    async fn replace_fields(
        &self,
        template_id: &Uuid,
        fields: &[FieldModel],
    ) -> Result<Vec<ChecklistFieldEntity>, error::SystemError>;

    async fn duplicate(
        &self,
        id: &Uuid,
        created_by: &Uuid,
    ) -> Result<TemplateDetail, error::SystemError>;
}
