use std::sync::Arc;

use actix_web::web;
use log::info;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        auth::session::SessionContext,
        checklist::service::ChecklistService,
        inspection::{
            model::{
                CreateActionItemModel, CreateInspectionModel, CreateItemModel, InspectionDetail,
                InspectionListQuery, InspectionPatch, NewInspection, NewMedia, SignatureModel,
                UpdateActionItemModel, UpdateInspectionModel,
            },
            repository::InspectionRepository,
            schema::{
                ActionItemEntity, InspectionEntity, InspectionItemEntity, InspectionMediaEntity,
                InspectionStatus,
            },
            status,
        },
        media::{MediaKind, model::DataUri},
        signature::{SignatureError, SignaturePad},
    },
};

const DEFAULT_LIST_LIMIT: i64 = 100;

/// Replays the strokes on a fresh pad and renders the captured signature.
pub fn render_signature(model: &SignatureModel) -> Result<String, SignatureError> {
    let mut pad = SignaturePad::new(model.width, model.height, model.pen_width);
    pad.replay(&model.strokes)?;
    pad.render_png()
}

fn ensure_editable(inspection: &InspectionEntity) -> Result<(), error::SystemError> {
    if inspection.status == InspectionStatus::Approved {
        return Err(error::SystemError::bad_request("Approved inspections are read-only"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct InspectionService {
    repo: Arc<dyn InspectionRepository + Send + Sync>,
    checklists: ChecklistService,
}

impl InspectionService {
    pub fn with_dependencies(
        repo: Arc<dyn InspectionRepository + Send + Sync>,
        checklists: ChecklistService,
    ) -> Self {
        info!("InspectionService initialized with dependencies");
        InspectionService { repo, checklists }
    }

    pub async fn list(
        &self,
        session: &SessionContext,
        query: InspectionListQuery,
    ) -> Result<Vec<InspectionEntity>, error::SystemError> {
        self.repo
            .list(
                &session.filter(),
                query.status,
                query.template_id,
                query.limit.unwrap_or(DEFAULT_LIST_LIMIT),
            )
            .await
    }

    pub async fn get(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<InspectionEntity, error::SystemError> {
        self.repo
            .find_by_id(&id)
            .await?
            .filter(|i| session.can_see(i.organization_id, i.inspector_id))
            .ok_or_else(|| error::SystemError::not_found("Inspection not found"))
    }

    pub async fn get_detail(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<InspectionDetail, error::SystemError> {
        let inspection = self.get(session, id).await?;
        let items = self.repo.find_items(&id).await?;
        let action_items = self.repo.find_action_items(&id).await?;
        Ok(InspectionDetail { inspection, items, action_items })
    }

    pub async fn create(
        &self,
        session: &SessionContext,
        model: CreateInspectionModel,
    ) -> Result<InspectionEntity, error::SystemError> {
        let organization_id = model.organization_id.or(session.profile.organization_id);
        if organization_id.is_some() && !session.scope.allows(organization_id) {
            return Err(error::SystemError::forbidden("Organization is outside your scope"));
        }
        if let Some(template_id) = model.template_id {
            self.checklists.get(session, template_id).await?;
        }

        let inspection = self
            .repo
            .create(&NewInspection {
                title: model.title.trim().to_string(),
                description: model.description,
                location: model.location,
                template_id: model.template_id,
                organization_id,
                inspector_id: session.user_id(),
                scheduled_at: model.scheduled_at,
            })
            .await?;
        info!("Inspection {} created by {}", inspection.id, session.user_id());
        Ok(inspection)
    }

    pub async fn update(
        &self,
        session: &SessionContext,
        id: Uuid,
        model: UpdateInspectionModel,
    ) -> Result<InspectionEntity, error::SystemError> {
        if model.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }
        let current = self.get(session, id).await?;

        let mut patch = InspectionPatch {
            title: model.title.map(|t| t.trim().to_string()),
            description: model.description,
            location: model.location,
            scheduled_at: model.scheduled_at,
            ..Default::default()
        };
        let edits_fields = patch.title.is_some()
            || patch.description.is_some()
            || patch.location.is_some()
            || patch.scheduled_at.is_some();
        if edits_fields {
            ensure_editable(&current)?;
        }

        if let Some(next) = model.status.filter(|next| *next != current.status) {
            status::check_transition(current.status, next, session.role())?;
            patch.status = Some(next);
            patch.completed_at =
                Some(status::completed_at_after(next, current.completed_at, chrono::Utc::now()));
            info!(
                "Inspection {} moved from {} to {}",
                id,
                current.status.as_str(),
                next.as_str()
            );
        }

        self.repo.update(&id, &patch).await
    }

    pub async fn delete(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.get(session, id).await?;
        if !self.repo.delete(&id).await? {
            return Err(error::SystemError::not_found("Inspection not found"));
        }
        Ok(())
    }

    pub async fn items(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<Vec<InspectionItemEntity>, error::SystemError> {
        self.get(session, id).await?;
        self.repo.find_items(&id).await
    }

    pub async fn add_items(
        &self,
        session: &SessionContext,
        id: Uuid,
        items: Vec<CreateItemModel>,
    ) -> Result<Vec<InspectionItemEntity>, error::SystemError> {
        let inspection = self.get(session, id).await?;
        ensure_editable(&inspection)?;
        self.repo.insert_items(&id, &items).await
    }

    pub async fn action_items(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<Vec<ActionItemEntity>, error::SystemError> {
        self.get(session, id).await?;
        self.repo.find_action_items(&id).await
    }

    pub async fn add_action_item(
        &self,
        session: &SessionContext,
        id: Uuid,
        model: CreateActionItemModel,
    ) -> Result<ActionItemEntity, error::SystemError> {
        self.get(session, id).await?;
        self.repo.create_action_item(&id, &model).await
    }

    pub async fn update_action_item(
        &self,
        session: &SessionContext,
        id: Uuid,
        item_id: Uuid,
        model: UpdateActionItemModel,
    ) -> Result<ActionItemEntity, error::SystemError> {
        self.get(session, id).await?;
        self.repo.update_action_item(&id, &item_id, &model).await
    }

    pub async fn delete_action_item(
        &self,
        session: &SessionContext,
        id: Uuid,
        item_id: Uuid,
    ) -> Result<(), error::SystemError> {
        self.get(session, id).await?;
        if !self.repo.delete_action_item(&id, &item_id).await? {
            return Err(error::SystemError::not_found("Action item not found"));
        }
        Ok(())
    }

    pub async fn media(
        &self,
        session: &SessionContext,
        id: Uuid,
    ) -> Result<Vec<InspectionMediaEntity>, error::SystemError> {
        self.get(session, id).await?;
        self.repo.find_media(&id).await
    }

    pub async fn add_media(
        &self,
        session: &SessionContext,
        id: Uuid,
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    ) -> Result<InspectionMediaEntity, error::SystemError> {
        let inspection = self.get(session, id).await?;
        ensure_editable(&inspection)?;

        let media = NewMedia {
            inspection_id: id,
            media_type: MediaKind::from_mime(&mime_type),
            data_uri: DataUri::encode(&mime_type, &bytes),
            size_bytes: bytes.len() as i64,
            file_name,
            mime_type,
        };
        let media = self.repo.insert_media(&media).await?;
        info!(
            "Stored {:?} attachment {} ({} bytes) on inspection {}",
            media.media_type, media.id, media.size_bytes, id
        );
        Ok(media)
    }

    pub async fn delete_media(
        &self,
        session: &SessionContext,
        id: Uuid,
        media_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let inspection = self.get(session, id).await?;
        ensure_editable(&inspection)?;
        if !self.repo.delete_media(&id, &media_id).await? {
            return Err(error::SystemError::not_found("Media not found"));
        }
        Ok(())
    }

    pub async fn sign(
        &self,
        session: &SessionContext,
        id: Uuid,
        model: SignatureModel,
    ) -> Result<InspectionEntity, error::SystemError> {
        let inspection = self.get(session, id).await?;
        ensure_editable(&inspection)?;

        let signature = web::block(move || render_signature(&model))
            .await
            .map_err(|e| error::SystemError::InternalError(Box::new(e)))?
            .map_err(|e| match e {
                SignatureError::Render(_) => error::SystemError::InternalError(Box::new(e)),
                other => error::SystemError::bad_request(other.to_string()),
            })?;

        let inspection = self.repo.set_signature(&id, &signature).await?;
        info!("Inspection {} signed by {}", id, session.user_id());
        Ok(inspection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::signature::{Point, Stroke};

    fn model(strokes: Vec<Stroke>) -> SignatureModel {
        SignatureModel { strokes, width: 120, height: 60, pen_width: 3.0 }
    }

    #[test]
    fn signature_renders_png_data_uri() {
        let stroke = Stroke {
            points: vec![
                Point { x: 10.0, y: 30.0 },
                Point { x: 60.0, y: 20.0 },
                Point { x: 110.0, y: 40.0 },
            ],
        };
        let uri = render_signature(&model(vec![stroke])).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn empty_strokes_cannot_be_captured() {
        let err = render_signature(&model(vec![Stroke { points: vec![] }])).unwrap_err();
        assert_eq!(err, SignatureError::Empty);
    }
}
