use actix_web::{delete, get, patch, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    modules::{
        auth::session::SessionContext,
        organization::{
            model::{CreateOrganizationModel, UpdateOrganizationModel},
            schema::OrganizationEntity,
            service::OrganizationService,
        },
    },
    utils::ValidatedJson,
};

#[get("")]
pub async fn list_organizations(
    org_service: web::Data<OrganizationService>,
    session: SessionContext,
) -> Result<success::Success<Vec<OrganizationEntity>>, error::Error> {
    let orgs = org_service.list(&session.scope).await?;
    Ok(success::Success::ok(Some(orgs)).message("Organizations retrieved successfully"))
}

#[get("/{id}")]
pub async fn get_organization(
    org_service: web::Data<OrganizationService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<OrganizationEntity>, error::Error> {
    let org = org_service.get(&session.scope, id.into_inner()).await?;
    Ok(success::Success::ok(Some(org)))
}

#[post("")]
pub async fn create_organization(
    org_service: web::Data<OrganizationService>,
    session: SessionContext,
    body: ValidatedJson<CreateOrganizationModel>,
) -> Result<success::Success<OrganizationEntity>, error::Error> {
    let org = org_service.create(session.role(), &session.scope, body.0).await?;
    Ok(success::Success::created(Some(org)).message("Organization created successfully"))
}

#[patch("/{id}")]
pub async fn update_organization(
    org_service: web::Data<OrganizationService>,
    session: SessionContext,
    id: web::Path<Uuid>,
    body: ValidatedJson<UpdateOrganizationModel>,
) -> Result<success::Success<OrganizationEntity>, error::Error> {
    let org = org_service.update(&session.scope, id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(org)).message("Organization updated successfully"))
}

#[delete("/{id}")]
pub async fn delete_organization(
    org_service: web::Data<OrganizationService>,
    session: SessionContext,
    id: web::Path<Uuid>,
) -> Result<success::Success<()>, error::Error> {
    org_service.delete(&session.scope, id.into_inner()).await?;
    Ok(success::Success::no_content())
}
