use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        inspection::{
            model::{
                CreateActionItemModel, CreateItemModel, InspectionPatch, NewInspection, NewMedia,
                UpdateActionItemModel,
            },
            schema::{
                ActionItemEntity, InspectionEntity, InspectionItemEntity, InspectionMediaEntity,
                InspectionStatus,
            },
        },
        organization::scope::ScopeFilter,
    },
};

#[async_trait::async_trait]
pub trait InspectionRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<InspectionEntity>, error::SystemError>;

    async fn list(
        &self,
        scope: &ScopeFilter,
        status: Option<InspectionStatus>,
        template_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<InspectionEntity>, error::SystemError>;

    async fn create(
        &self,
        inspection: &NewInspection,
    ) -> Result<InspectionEntity, error::SystemError>;

    async fn update(
        &self,
        id: &Uuid,
        patch: &InspectionPatch,
    ) -> Result<InspectionEntity, error::SystemError>;

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    async fn set_signature(
        &self,
        id: &Uuid,
        signature: &str,
    ) -> Result<InspectionEntity, error::SystemError>;

    async fn find_items(
        &self,
        inspection_id: &Uuid,
    ) -> Result<Vec<InspectionItemEntity>, error::SystemError>;

    async fn insert_items(
        &self,
        inspection_id: &Uuid,
        items: &[CreateItemModel],
    ) -> Result<Vec<InspectionItemEntity>, error::SystemError>;

    async fn find_action_items(
        &self,
        inspection_id: &Uuid,
    ) -> Result<Vec<ActionItemEntity>, error::SystemError>;

    async fn create_action_item(
        &self,
        inspection_id: &Uuid,
        item: &CreateActionItemModel,
    ) -> Result<ActionItemEntity, error::SystemError>;

    /// Updates an action item only if it belongs to `inspection_id`.
    async fn update_action_item(
        &self,
        inspection_id: &Uuid,
        id: &Uuid,
        item: &UpdateActionItemModel,
    ) -> Result<ActionItemEntity, error::SystemError>;

    async fn delete_action_item(
        &self,
        inspection_id: &Uuid,
        id: &Uuid,
    ) -> Result<bool, error::SystemError>;

    async fn find_media(
        &self,
        inspection_id: &Uuid,
    ) -> Result<Vec<InspectionMediaEntity>, error::SystemError>;

    async fn insert_media(
        &self,
        media: &NewMedia,
    ) -> Result<InspectionMediaEntity, error::SystemError>;

    async fn delete_media(
        &self,
        inspection_id: &Uuid,
        id: &Uuid,
    ) -> Result<bool, error::SystemError>;
}
