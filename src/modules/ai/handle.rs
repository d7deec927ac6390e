use actix_web::{delete, get, patch, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    modules::{
        ai::{
            model::{AnalyzeModel, AnalyzeResponse, CreateAssistantModel, UpdateAssistantModel},
            schema::AiAssistantEntity,
            service::AiService,
        },
        auth::session::SessionContext,
    },
    utils::ValidatedJson,
};

#[get("")]
pub async fn list_assistants(
    ai_service: web::Data<AiService>,
    session: SessionContext,
) -> Result<success::Success<Vec<AiAssistantEntity>>, error::Error> {
    let assistants = ai_service.list_assistants(&session).await?;
    Ok(success::Success::ok(Some(assistants)).message("Assistants retrieved successfully"))
}

#[get("/{id}")]
pub async fn get_assistant(
    ai_service: web::Data<AiService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<AiAssistantEntity>, error::Error> {
    let assistant = ai_service.get_assistant(&session, id.into_inner()).await?;
    Ok(success::Success::ok(Some(assistant)))
}

#[post("")]
pub async fn create_assistant(
    ai_service: web::Data<AiService>,
    session: SessionContext,
    body: ValidatedJson<CreateAssistantModel>,
) -> Result<success::Success<AiAssistantEntity>, error::Error> {
    let assistant = ai_service.create_assistant(&session, body.0).await?;
    Ok(success::Success::created(Some(assistant)).message("Assistant created successfully"))
}

#[patch("/{id}")]
pub async fn update_assistant(
    ai_service: web::Data<AiService>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: ValidatedJson<UpdateAssistantModel>,
) -> Result<success::Success<AiAssistantEntity>, error::Error> {
    let assistant = ai_service.update_assistant(&session, id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(assistant)).message("Assistant updated successfully"))
}

#[delete("/{id}")]
pub async fn delete_assistant(
    ai_service: web::Data<AiService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<()>, error::Error> {
    ai_service.delete_assistant(&session, id.into_inner()).await?;
    Ok(success::Success::no_content())
}

#[post("/analyze")]
pub async fn analyze_inspection(
    ai_service: web::Data<AiService>,
    session: SessionContext,
    body: ValidatedJson<AnalyzeModel>,
) -> Result<success::Success<AnalyzeResponse>, error::Error> {
    let response = ai_service.analyze(&session, body.0).await?;
    Ok(success::Success::ok(Some(response)).message("Inspection analyzed"))
}
