use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::{
    ENV,
    api::error,
    modules::{
        ai::client::{AiClient, ChecklistRequest},
        auth::session::SessionContext,
        checklist::{
            export,
            model::{
                CreateTemplateModel, FieldModel, GenerateChecklistModel, GeneratedChecklist,
                NewTemplate, TemplateDetail, TemplateListQuery, UpdateTemplateModel,
            },
            repository::ChecklistRepository,
            schema::{ChecklistFieldEntity, ChecklistTemplateEntity, FieldType},
        },
    },
};

/// Rejects `select` fields without options and blank option labels.
pub fn check_fields(fields: &[FieldModel]) -> Result<(), error::SystemError> {
    for (idx, field) in fields.iter().enumerate() {
        if field.label.trim().is_empty() {
            return Err(error::SystemError::bad_request(format!(
                "Field {} has an empty label",
                idx + 1
            )));
        }
        if field.field_type == FieldType::Select && field.options.is_empty() {
            return Err(error::SystemError::bad_request(format!(
                "Select field \"{}\" needs at least one option",
                field.label
            )));
        }
        if field.options.iter().any(|o| o.trim().is_empty()) {
            return Err(error::SystemError::bad_request(format!(
                "Field \"{}\" has an empty option",
                field.label
            )));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct ChecklistService {
    repo: Arc<dyn ChecklistRepository + Send + Sync>,
    ai: Option<Arc<dyn AiClient + Send + Sync>>,
}

impl ChecklistService {
    pub fn with_dependencies(
        repo: Arc<dyn ChecklistRepository + Send + Sync>,
        ai: Option<Arc<dyn AiClient + Send + Sync>>,
    ) -> Self {
        info!("ChecklistService initialized with dependencies");
        ChecklistService { repo, ai }
    }

    pub async fn list(
        &self,
        session: &SessionContext,
        query: TemplateListQuery,
    ) -> Result<Vec<ChecklistTemplateEntity>, error::SystemError> {
        self.repo.list(&session.filter(), query.category.as_deref(), query.active).await
    }

    pub async fn get(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<ChecklistTemplateEntity, error::SystemError> {
        let template = self
            .repo
            .find_by_id(&id)
            .await?
            .filter(|t| session.can_see(t.organization_id, t.created_by))
            .ok_or_else(|| error::SystemError::not_found("Checklist template not found"))?;
        Ok(template)
    }

    pub async fn get_detail(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<TemplateDetail, error::SystemError> {
        let template = self.get(session, id).await?;
        let fields = self.repo.find_fields(&template.id).await?;
        Ok(TemplateDetail { template, fields })
    }

    pub async fn create(
        &self,
        session: &SessionContext,
        model: CreateTemplateModel,
    ) -> Result<TemplateDetail, error::SystemError> {
        check_fields(&model.fields)?;
        let organization_id = model.organization_id.or(session.profile.organization_id);
        if organization_id.is_some() && !session.scope.allows(organization_id) {
            return Err(error::SystemError::forbidden("Organization is outside your scope"));
        }

        let template = NewTemplate {
            name: model.name.trim().to_string(),
            description: model.description,
            category: model.category,
            organization_id,
            created_by: session.user_id(),
        };
        let detail = self.repo.create(&template, &model.fields).await?;
        info!("Checklist template {} created by {}", detail.template.id, session.user_id());
        Ok(detail)
    }

    pub async fn update(
        &self,
        session: &SessionContext,
        id: Uuid,
        model: UpdateTemplateModel,
    ) -> Result<ChecklistTemplateEntity, error::SystemError> {
        self.get(session, id).await?;
        self.repo.update(&id, &model).await
    }

    pub async fn delete(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.get(session, id).await?;
        if !self.repo.delete(&id).await? {
            return Err(error::SystemError::not_found("Checklist template not found"));
        }
        Ok(())
    }

    pub async fn duplicate(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<TemplateDetail, error::SystemError> {
        self.get(session, id).await?;
        let copy = self.repo.duplicate(&id, &session.user_id()).await?;
        info!("Checklist template {} duplicated as {}", id, copy.template.id);
        Ok(copy)
    }

    pub async fn fields(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<Vec<ChecklistFieldEntity>, error::SystemError> {
        self.get(session, id).await?;
        self.repo.find_fields(&id).await
    }

    pub async fn replace_fields(
        &self,
        session: &SessionContext,
        id: Uuid,
        fields: Vec<FieldModel>,
    ) -> Result<Vec<ChecklistFieldEntity>, error::SystemError> {
        check_fields(&fields)?;
        self.get(session, id).await?;
        self.repo.replace_fields(&id, &fields).await
    }

    /// Returns the template name and its CSV rendering.
    pub async fn export_csv(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<(String, String), error::SystemError> {
        let detail = self.get_detail(session, id).await?;
        Ok((export::export_file_name(&detail.template.name), export::fields_to_csv(&detail.fields)))
    }

    pub async fn generate(
        &self,
        session: &SessionContext,
        model: GenerateChecklistModel,
    ) -> Result<GeneratedChecklist, error::SystemError> {
        let ai = self
            .ai
            .as_ref()
            .ok_or_else(|| error::SystemError::unavailable("AI service is not configured"))?;

        let request = ChecklistRequest {
            model: ENV.ai_model.clone(),
            prompt: model.prompt.trim().to_string(),
            category: model.category.clone(),
        };
        let draft = ai.generate_checklist(&request).await?;
        check_fields(&draft.fields)?;

        let name = model
            .name
            .or(draft.name)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Generated checklist".to_string());
        info!("Generated {} checklist fields for {}", draft.fields.len(), session.user_id());

        let template = if model.save {
            let create = CreateTemplateModel {
                name: name.clone(),
                description: Some(request.prompt),
                category: model.category,
                organization_id: None,
                fields: draft.fields.clone(),
            };
            Some(self.create(session, create).await?)
        } else {
            None
        };

        Ok(GeneratedChecklist { name, fields: draft.fields, template })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(field_type: FieldType, options: &[&str]) -> FieldModel {
        FieldModel {
            label: "Hazard signage posted".into(),
            field_type,
            required: true,
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    #[test]
    fn select_requires_options() {
        assert!(check_fields(&[field(FieldType::Select, &[])]).is_err());
        assert!(check_fields(&[field(FieldType::Select, &["Yes", "No"])]).is_ok());
        assert!(check_fields(&[field(FieldType::Checkbox, &[])]).is_ok());
    }

    #[test]
    fn blank_options_and_labels_are_rejected() {
        assert!(check_fields(&[field(FieldType::Select, &["Yes", " "])]).is_err());

        let mut blank = field(FieldType::Text, &[]);
        blank.label = "   ".into();
        assert!(matches!(check_fields(&[blank]), Err(error::SystemError::BadRequest(_))));
    }
}
