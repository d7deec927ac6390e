use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    modules::{
        ai::client::AnalysisResponse,
        media::{MediaClassification, MediaValidation, PreparedMedia},
    },
    utils::double_option,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssistantModel {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 20000, message = "System prompt cannot be empty"))]
    pub system_prompt: String,
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    pub organization_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAssistantModel {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[validate(length(min = 1, max = 20000))]
    pub system_prompt: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    pub is_active: Option<bool>,
}

pub struct NewAssistant {
    pub name: String,
    pub description: Option<String>,
    pub system_prompt: String,
    pub model: String,
    pub organization_id: Option<Uuid>,
    pub created_by: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeModel {
    pub inspection_id: Uuid,
    pub assistant_id: Option<Uuid>,
    #[validate(length(min = 1, max = 4000))]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OptimizationSummary {
    pub report: String,
    pub processed_images: usize,
    pub skipped_images: usize,
    pub failed_images: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisResponse,
    pub optimization: OptimizationSummary,
    pub validation: MediaValidation,
    /// Media not sent as images, with the note that replaced them.
    pub context_notes: Vec<String>,
}

/// Item counts as `(vision, contextual, excluded)`.
pub fn count_by_method(
    classification: &MediaClassification<PreparedMedia>,
) -> (usize, usize, usize) {
    (
        classification.processable.len(),
        classification.contextual.len(),
        classification.excluded.len(),
    )
}
