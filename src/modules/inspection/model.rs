use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    modules::{
        inspection::schema::{
            ActionItemEntity, ActionPriority, ActionStatus, InspectionEntity, InspectionItemEntity,
            InspectionMediaEntity, InspectionStatus,
        },
        media::{MediaKind, RawMedia},
        signature::Stroke,
    },
    utils::double_option,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInspectionModel {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 300))]
    pub location: Option<String>,
    pub template_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub scheduled_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateInspectionModel {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub scheduled_at: Option<Option<chrono::DateTime<chrono::Utc>>>,
    pub status: Option<InspectionStatus>,
}

impl UpdateInspectionModel {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.scheduled_at.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct InspectionListQuery {
    pub status: Option<InspectionStatus>,
    pub template_id: Option<Uuid>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateItemModel {
    pub field_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200))]
    pub label: String,
    #[validate(length(max = 5000))]
    pub value: Option<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    pub passed: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveItemsModel {
    #[validate(length(min = 1, max = 500, message = "Provide 1-500 items"))]
    #[validate(nested)]
    pub items: Vec<CreateItemModel>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateActionItemModel {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: ActionPriority,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<chrono::NaiveDate>,
}

fn default_priority() -> ActionPriority {
    ActionPriority::Medium
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateActionItemModel {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub priority: Option<ActionPriority>,
    pub status: Option<ActionStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<chrono::NaiveDate>>,
}

pub const MAX_SIGNATURE_POINTS: usize = 20_000;

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "check_signature_points"))]
pub struct SignatureModel {
    #[validate(length(min = 1, max = 200, message = "Provide 1-200 strokes"))]
    #[validate(nested)]
    pub strokes: Vec<Stroke>,
    #[serde(default = "default_pad_width")]
    #[validate(range(min = 50, max = 2000))]
    pub width: u32,
    #[serde(default = "default_pad_height")]
    #[validate(range(min = 50, max = 1000))]
    pub height: u32,
    #[serde(default = "default_pen_width")]
    #[validate(range(min = 0.5, max = 20.0))]
    pub pen_width: f32,
}

fn check_signature_points(model: &SignatureModel) -> Result<(), validator::ValidationError> {
    let total: usize = model.strokes.iter().map(|s| s.points.len()).sum();
    if total > MAX_SIGNATURE_POINTS {
        let message = format!("A signature may have at most {MAX_SIGNATURE_POINTS} points");
        return Err(validator::ValidationError::new("too_many_points").with_message(message.into()));
    }
    Ok(())
}

fn default_pad_width() -> u32 {
    600
}

fn default_pad_height() -> u32 {
    200
}

fn default_pen_width() -> f32 {
    2.0
}

pub struct NewInspection {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub template_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub inspector_id: Uuid,
    pub scheduled_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Column changes for an inspection; `None` leaves a column untouched.
#[derive(Default)]
pub struct InspectionPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub scheduled_at: Option<Option<chrono::DateTime<chrono::Utc>>>,
    pub status: Option<InspectionStatus>,
    pub completed_at: Option<Option<chrono::DateTime<chrono::Utc>>>,
}

pub struct NewMedia {
    pub inspection_id: Uuid,
    pub media_type: MediaKind,
    pub file_name: String,
    pub mime_type: String,
    pub data_uri: String,
    pub size_bytes: i64,
}

#[derive(Debug, Serialize)]
pub struct InspectionDetail {
    #[serde(flatten)]
    pub inspection: InspectionEntity,
    pub items: Vec<InspectionItemEntity>,
    pub action_items: Vec<ActionItemEntity>,
}

impl From<&InspectionMediaEntity> for RawMedia {
    fn from(media: &InspectionMediaEntity) -> Self {
        RawMedia {
            kind: media.media_type,
            data: media.data_uri.clone(),
            size: media.size_bytes.max(0) as u64,
            name: Some(media.file_name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_clearing_from_omitting() {
        let model: UpdateInspectionModel =
            serde_json::from_str(r#"{"location": null, "status": "in_progress"}"#).unwrap();
        assert_eq!(model.location, Some(None));
        assert!(model.description.is_none());
        assert_eq!(model.status, Some(InspectionStatus::InProgress));
        assert!(!model.is_empty());

        let empty: UpdateInspectionModel = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn signature_defaults_apply() {
        let model: SignatureModel =
            serde_json::from_str(r#"{"strokes":[{"points":[{"x":1.0,"y":2.0}]}]}"#).unwrap();
        assert_eq!((model.width, model.height), (600, 200));
        assert!(model.validate().is_ok());
    }

    #[test]
    fn signature_rejects_far_off_points() {
        let model: SignatureModel = serde_json::from_str(
            r#"{"strokes":[{"points":[{"x":0,"y":0},{"x":1e12,"y":0}]}]}"#,
        )
        .unwrap();
        assert!(model.validate().is_err());
    }

    #[test]
    fn signature_point_total_is_capped() {
        let stroke = Stroke {
            points: vec![crate::modules::signature::Point { x: 1.0, y: 1.0 }; 5000],
        };
        let model =
            SignatureModel { strokes: vec![stroke; 5], width: 600, height: 200, pen_width: 2.0 };
        let errors = model.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn items_are_validated_individually() {
        let model: SaveItemsModel =
            serde_json::from_str(r#"{"items":[{"label":"Guard rails secure"},{"label":""}]}"#)
                .unwrap();
        assert!(model.validate().is_err());

        let model: SaveItemsModel =
            serde_json::from_str(r#"{"items":[{"label":"Guard rails secure","passed":true}]}"#)
                .unwrap();
        assert!(model.validate().is_ok());
    }

    #[test]
    fn action_item_priority_defaults_to_medium() {
        let model: CreateActionItemModel =
            serde_json::from_str(r#"{"title":"Replace frayed cable"}"#).unwrap();
        assert_eq!(model.priority, ActionPriority::Medium);
    }
}
