use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "org_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrgType {
    Master,
    Company,
    Subsidiary,
}

impl OrgType {
    /// The org type a parent must have, or `None` for root organizations.
    pub fn required_parent(&self) -> Option<OrgType> {
        match self {
            OrgType::Master => None,
            OrgType::Company => Some(OrgType::Master),
            OrgType::Subsidiary => Some(OrgType::Company),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrganizationEntity {
    pub id: Uuid,
    pub name: String,
    pub org_type: OrgType,
    pub parent_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
