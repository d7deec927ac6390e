use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::modules::organization::schema::OrgType;

#[derive(Deserialize, Validate)]
pub struct CreateOrganizationModel {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub name: String,
    pub org_type: OrgType,
    pub parent_id: Option<Uuid>,
}

#[derive(Deserialize, Validate)]
pub struct UpdateOrganizationModel {
    #[validate(length(min = 2, max = 120, message = "Name must be 2-120 characters"))]
    pub name: String,
}

pub struct NewOrganization {
    pub name: String,
    pub org_type: OrgType,
    pub parent_id: Option<Uuid>,
}
