use uuid::Uuid;

use crate::{
    api::error,
    modules::organization::{model::NewOrganization, schema::OrganizationEntity},
};

#[async_trait::async_trait]
pub trait OrganizationRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<OrganizationEntity>, error::SystemError>;

    /// Every organization below `id`, at any depth.
    async fn find_descendant_ids(&self, id: &Uuid) -> Result<Vec<Uuid>, error::SystemError>;

    /// `None` lists every organization.
    async fn list(
        &self,
        ids: Option<&[Uuid]>,
    ) -> Result<Vec<OrganizationEntity>, error::SystemError>;

    async fn create(&self, org: &NewOrganization) -> Result<OrganizationEntity, error::SystemError>;

    async fn rename(&self, id: &Uuid, name: &str) -> Result<OrganizationEntity, error::SystemError>;

    async fn count_children(&self, id: &Uuid) -> Result<i64, error::SystemError>;

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;
}
