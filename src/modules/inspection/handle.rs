use actix_multipart::Multipart;
use actix_web::{delete, get, patch, post, web};
use futures_util::TryStreamExt;
use uuid::Uuid;

use crate::{
    ENV,
    api::{error, success},
    modules::{
        auth::session::SessionContext,
        inspection::{
            model::{
                CreateActionItemModel, CreateInspectionModel, InspectionDetail, InspectionListQuery,
                SaveItemsModel, SignatureModel, UpdateActionItemModel, UpdateInspectionModel,
            },
            schema::{
                ActionItemEntity, InspectionEntity, InspectionItemEntity, InspectionMediaEntity,
            },
            service::InspectionService,
        },
    },
    utils::{ValidatedJson, ValidatedQuery},
};

#[get("")]
pub async fn list_inspections(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    query: ValidatedQuery<InspectionListQuery>,
) -> Result<success::Success<Vec<InspectionEntity>>, error::Error> {
    let inspections = inspection_service.list(&session, query.0).await?;
    Ok(success::Success::ok(Some(inspections)).message("Inspections retrieved successfully"))
}

#[get("/{id}")]
pub async fn get_inspection(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<InspectionDetail>, error::Error> {
    let detail = inspection_service.get_detail(&session, id.into_inner()).await?;
    Ok(success::Success::ok(Some(detail)))
}

#[post("")]
pub async fn create_inspection(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    body: ValidatedJson<CreateInspectionModel>,
) -> Result<success::Success<InspectionEntity>, error::Error> {
    let inspection = inspection_service.create(&session, body.0).await?;
    Ok(success::Success::created(Some(inspection)).message("Inspection created successfully"))
}

#[patch("/{id}")]
pub async fn update_inspection(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: ValidatedJson<UpdateInspectionModel>,
) -> Result<success::Success<InspectionEntity>, error::Error> {
    let inspection = inspection_service.update(&session, id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(inspection)).message("Inspection updated successfully"))
}

/// Registered as a guarded resource so it can carry its own permission check.
pub async fn delete_inspection(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<()>, error::Error> {
    inspection_service.delete(&session, id.into_inner()).await?;
    Ok(success::Success::no_content())
}

#[get("/{id}/items")]
pub async fn list_items(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<Vec<InspectionItemEntity>>, error::Error> {
    let items = inspection_service.items(&session, id.into_inner()).await?;
    Ok(success::Success::ok(Some(items)))
}

#[post("/{id}/items")]
pub async fn add_items(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: ValidatedJson<SaveItemsModel>,
) -> Result<success::Success<Vec<InspectionItemEntity>>, error::Error> {
    let items = inspection_service.add_items(&session, id.into_inner(), body.0.items).await?;
    Ok(success::Success::created(Some(items)).message("Inspection items saved successfully"))
}

#[get("/{id}/action-items")]
pub async fn list_action_items(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<Vec<ActionItemEntity>>, error::Error> {
    let items = inspection_service.action_items(&session, id.into_inner()).await?;
    Ok(success::Success::ok(Some(items)))
}

#[post("/{id}/action-items")]
pub async fn create_action_item(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: ValidatedJson<CreateActionItemModel>,
) -> Result<success::Success<ActionItemEntity>, error::Error> {
    let item = inspection_service.add_action_item(&session, id.into_inner(), body.0).await?;
    Ok(success::Success::created(Some(item)).message("Action item created successfully"))
}

#[patch("/{id}/action-items/{item_id}")]
pub async fn update_action_item(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    path: web::Path<(Uuid, Uuid)>,
    body: ValidatedJson<UpdateActionItemModel>,
) -> Result<success::Success<ActionItemEntity>, error::Error> {
    let (id, item_id) = path.into_inner();
    let item = inspection_service.update_action_item(&session, id, item_id, body.0).await?;
    Ok(success::Success::ok(Some(item)).message("Action item updated successfully"))
}

#[delete("/{id}/action-items/{item_id}")]
pub async fn delete_action_item(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<success::Success<()>, error::Error> {
    let (id, item_id) = path.into_inner();
    inspection_service.delete_action_item(&session, id, item_id).await?;
    Ok(success::Success::no_content())
}

#[get("/{id}/media")]
pub async fn list_media(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<Vec<InspectionMediaEntity>>, error::Error> {
    let media = inspection_service.media(&session, id.into_inner()).await?;
    Ok(success::Success::ok(Some(media)))
}

#[post("/{id}/media")]
pub async fn upload_media(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    id: web::Path<Uuid>,
    mut payload: Multipart,
) -> Result<success::Success<InspectionMediaEntity>, error::Error> {
    let next_field =
        payload.try_next().await.map_err(|e| error::Error::bad_request(e.to_string()))?;
    if let Some(mut field) = next_field {
        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| error::Error::bad_request("Missing content disposition"))?;

        let filename = content_disposition
            .get_filename()
            .ok_or_else(|| error::Error::bad_request("Missing filename"))?
            .to_string();

        let mime_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .filter(|m| m != "application/octet-stream")
            .unwrap_or_else(|| {
                mime_guess::from_path(&filename).first_or_octet_stream().essence_str().to_string()
            });

        let mut bytes = Vec::new();
        while let Some(chunk) =
            field.try_next().await.map_err(|e| error::Error::bad_request(e.to_string()))?
        {
            if bytes.len() + chunk.len() > ENV.max_upload_bytes {
                return Err(error::Error::bad_request(format!(
                    "File exceeds the {} MB upload limit",
                    ENV.max_upload_bytes / (1024 * 1024)
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        if bytes.is_empty() {
            return Err(error::Error::bad_request("Uploaded file is empty"));
        }

        let media = inspection_service
            .add_media(&session, id.into_inner(), filename, mime_type, bytes)
            .await?;
        return Ok(success::Success::created(Some(media)).message("Media uploaded successfully"));
    }

    Err(error::Error::bad_request("No file found in request"))
}

#[delete("/{id}/media/{media_id}")]
pub async fn delete_media(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<success::Success<()>, error::Error> {
    let (id, media_id) = path.into_inner();
    inspection_service.delete_media(&session, id, media_id).await?;
    Ok(success::Success::no_content())
}

#[post("/{id}/signature")]
pub async fn sign_inspection(
    inspection_service: web::Data<InspectionService>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: ValidatedJson<SignatureModel>,
) -> Result<success::Success<InspectionEntity>, error::Error> {
    let inspection = inspection_service.sign(&session, id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(inspection)).message("Signature saved successfully"))
}
