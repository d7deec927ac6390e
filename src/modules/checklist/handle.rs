use actix_web::{HttpResponse, delete, get, http::header, post, put, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    modules::{
        auth::session::SessionContext,
        checklist::{
            model::{
                CreateTemplateModel, GenerateChecklistModel, GeneratedChecklist, ReplaceFieldsModel,
                TemplateDetail, TemplateListQuery, UpdateTemplateModel,
            },
            schema::{ChecklistFieldEntity, ChecklistTemplateEntity},
            service::ChecklistService,
        },
    },
    utils::{ValidatedJson, ValidatedQuery},
};

#[get("")]
pub async fn list_templates(
    checklist_service: web::Data<ChecklistService>,
    session: SessionContext,
    query: ValidatedQuery<TemplateListQuery>,
) -> Result<success::Success<Vec<ChecklistTemplateEntity>>, error::Error> {
    let templates = checklist_service.list(&session, query.0).await?;
    Ok(success::Success::ok(Some(templates)).message("Checklist templates retrieved successfully"))
}

#[get("/{id}")]
pub async fn get_template(
    checklist_service: web::Data<ChecklistService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<TemplateDetail>, error::Error> {
    let detail = checklist_service.get_detail(&session, id.into_inner()).await?;
    Ok(success::Success::ok(Some(detail)))
}

#[post("")]
pub async fn create_template(
    checklist_service: web::Data<ChecklistService>,
    session: SessionContext,
    body: ValidatedJson<CreateTemplateModel>,
) -> Result<success::Success<TemplateDetail>, error::Error> {
    let detail = checklist_service.create(&session, body.0).await?;
    Ok(success::Success::created(Some(detail)).message("Checklist template created successfully"))
}

#[put("/{id}")]
pub async fn update_template(
    checklist_service: web::Data<ChecklistService>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: ValidatedJson<UpdateTemplateModel>,
) -> Result<success::Success<ChecklistTemplateEntity>, error::Error> {
    let template = checklist_service.update(&session, id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(template)).message("Checklist template updated successfully"))
}

#[delete("/{id}")]
pub async fn delete_template(
    checklist_service: web::Data<ChecklistService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<()>, error::Error> {
    checklist_service.delete(&session, id.into_inner()).await?;
    Ok(success::Success::no_content())
}

#[post("/{id}/duplicate")]
pub async fn duplicate_template(
    checklist_service: web::Data<ChecklistService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<TemplateDetail>, error::Error> {
    let copy = checklist_service.duplicate(&session, id.into_inner()).await?;
    Ok(success::Success::created(Some(copy)).message("Checklist template duplicated successfully"))
}

#[get("/{id}/fields")]
pub async fn get_fields(
    checklist_service: web::Data<ChecklistService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<Vec<ChecklistFieldEntity>>, error::Error> {
    let fields = checklist_service.fields(&session, id.into_inner()).await?;
    Ok(success::Success::ok(Some(fields)))
}

#[put("/{id}/fields")]
pub async fn replace_fields(
    checklist_service: web::Data<ChecklistService>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: ValidatedJson<ReplaceFieldsModel>,
) -> Result<success::Success<Vec<ChecklistFieldEntity>>, error::Error> {
    let fields = checklist_service.replace_fields(&session, id.into_inner(), body.0.fields).await?;
    Ok(success::Success::ok(Some(fields)).message("Checklist fields saved successfully"))
}

#[get("/{id}/export")]
pub async fn export_template(
    checklist_service: web::Data<ChecklistService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, error::Error> {
    let (file_name, csv) = checklist_service.export_csv(&session, id.into_inner()).await?;
    let disposition = format!("attachment; filename=\"{file_name}\"");
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((header::CONTENT_DISPOSITION, disposition))
        .body(csv))
}

#[post("")]
pub async fn generate_checklist(
    checklist_service: web::Data<ChecklistService>,
    session: SessionContext,
    body: ValidatedJson<GenerateChecklistModel>,
) -> Result<success::Success<GeneratedChecklist>, error::Error> {
    let generated = checklist_service.generate(&session, body.0).await?;
    Ok(success::Success::ok(Some(generated)).message("Checklist generated successfully"))
}
