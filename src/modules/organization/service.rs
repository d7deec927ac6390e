use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        organization::{
            model::{CreateOrganizationModel, NewOrganization, UpdateOrganizationModel},
            repository::OrganizationRepository,
            schema::OrganizationEntity,
            scope::OrgScope,
        },
        user::schema::{UserEntity, UserRole},
    },
};

#[derive(Clone)]
pub struct OrganizationService {
    repo: Arc<dyn OrganizationRepository + Send + Sync>,
}

impl OrganizationService {
    pub fn with_dependencies(repo: Arc<dyn OrganizationRepository + Send + Sync>) -> Self {
        OrganizationService { repo }
    }

    pub async fn resolve_scope(
        &self,
        profile: &UserEntity,
    ) -> Result<OrgScope, error::SystemError> {
        if profile.role == UserRole::SuperAdmin {
            return Ok(OrgScope::All);
        }
        let Some(org_id) = profile.organization_id else {
            return Ok(OrgScope::Own);
        };

        let org = self.repo.find_by_id(&org_id).await?;
        let descendants = match &org {
            Some(_) => self.repo.find_descendant_ids(&org_id).await?,
            None => Vec::new(),
        };
        Ok(OrgScope::resolve(profile.role, org.as_ref(), descendants))
    }

    pub async fn list(
        &self,
        scope: &OrgScope,
    ) -> Result<Vec<OrganizationEntity>, error::SystemError> {
        match scope {
            OrgScope::All => self.repo.list(None).await,
            OrgScope::Orgs(ids) => self.repo.list(Some(ids)).await,
            OrgScope::Own => Ok(Vec::new()),
        }
    }

    pub async fn get(
        &self,
        scope: &OrgScope,
        id: Uuid,
    ) -> Result<OrganizationEntity, error::SystemError> {
        if !scope.allows(Some(id)) {
            return Err(error::SystemError::not_found("Organization not found"));
        }
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Organization not found"))
    }

    pub async fn create(
        &self,
        role: UserRole,
        scope: &OrgScope,
        model: CreateOrganizationModel,
    ) -> Result<OrganizationEntity, error::SystemError> {
        match (model.org_type.required_parent(), model.parent_id) {
            (None, Some(_)) => {
                return Err(error::SystemError::bad_request(
                    "Master organizations cannot have a parent",
                ));
            }
            (None, None) => {
                if role != UserRole::SuperAdmin {
                    return Err(error::SystemError::forbidden(
                        "Only super admins can create master organizations",
                    ));
                }
            }
            (Some(_), None) => {
                return Err(error::SystemError::bad_request("Parent organization is required"));
            }
            (Some(expected), Some(parent_id)) => {
                let parent = self.get(scope, parent_id).await?;
                if parent.org_type != expected {
                    return Err(error::SystemError::bad_request(format!(
                        "Parent of a {:?} organization must be a {:?} organization",
                        model.org_type, expected
                    )));
                }
            }
        }

        let org = self
            .repo
            .create(&NewOrganization {
                name: model.name.trim().to_string(),
                org_type: model.org_type,
                parent_id: model.parent_id,
            })
            .await?;
        log::info!("Organization {} ({:?}) created", org.id, org.org_type);
        Ok(org)
    }

    pub async fn update(
        &self,
        scope: &OrgScope,
        id: Uuid,
        model: UpdateOrganizationModel,
    ) -> Result<OrganizationEntity, error::SystemError> {
        self.get(scope, id).await?;
        self.repo.rename(&id, model.name.trim()).await
    }

    pub async fn delete(&self, scope: &OrgScope, id: Uuid) -> Result<(), error::SystemError> {
        self.get(scope, id).await?;
        if self.repo.count_children(&id).await? > 0 {
            return Err(error::SystemError::bad_request(
                "Organization still has child organizations",
            ));
        }
        if !self.repo.delete(&id).await? {
            return Err(error::SystemError::not_found("Organization not found"));
        }
        Ok(())
    }
}
