use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::checklist::schema::{ChecklistFieldEntity, ChecklistTemplateEntity, FieldType};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FieldModel {
    #[validate(length(min = 1, max = 200, message = "Label must be 1-200 characters"))]
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTemplateModel {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub organization_id: Option<Uuid>,
    #[serde(default)]
    #[validate(nested)]
    pub fields: Vec<FieldModel>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTemplateModel {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceFieldsModel {
    #[validate(length(max = 200, message = "A template holds at most 200 fields"))]
    #[validate(nested)]
    pub fields: Vec<FieldModel>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TemplateListQuery {
    #[validate(length(max = 100))]
    pub category: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateChecklistModel {
    #[validate(length(min = 5, max = 2000, message = "Prompt must be 5-2000 characters"))]
    pub prompt: String,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    /// Persist the generated fields as a new template.
    #[serde(default)]
    pub save: bool,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
}

pub struct NewTemplate {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub organization_id: Option<Uuid>,
    pub created_by: Uuid,
}

#[derive(Debug, Serialize)]
pub struct TemplateDetail {
    #[serde(flatten)]
    pub template: ChecklistTemplateEntity,
    pub fields: Vec<ChecklistFieldEntity>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedChecklist {
    pub name: String,
    pub fields: Vec<FieldModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateDetail>,
}
