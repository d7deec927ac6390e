use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::modules::user::schema::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "inspections.read")]
    InspectionsRead,
    #[serde(rename = "inspections.write")]
    InspectionsWrite,
    #[serde(rename = "inspections.delete")]
    InspectionsDelete,
    #[serde(rename = "checklists.read")]
    ChecklistsRead,
    #[serde(rename = "checklists.write")]
    ChecklistsWrite,
    #[serde(rename = "reports.read")]
    ReportsRead,
    #[serde(rename = "organizations.manage")]
    OrganizationsManage,
    #[serde(rename = "users.manage")]
    UsersManage,
    #[serde(rename = "ai.use")]
    AiUse,
}

impl Permission {
    pub const ALL: [Permission; 9] = [
        Permission::InspectionsRead,
        Permission::InspectionsWrite,
        Permission::InspectionsDelete,
        Permission::ChecklistsRead,
        Permission::ChecklistsWrite,
        Permission::ReportsRead,
        Permission::OrganizationsManage,
        Permission::UsersManage,
        Permission::AiUse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::InspectionsRead => "inspections.read",
            Permission::InspectionsWrite => "inspections.write",
            Permission::InspectionsDelete => "inspections.delete",
            Permission::ChecklistsRead => "checklists.read",
            Permission::ChecklistsWrite => "checklists.write",
            Permission::ReportsRead => "reports.read",
            Permission::OrganizationsManage => "organizations.manage",
            Permission::UsersManage => "users.manage",
            Permission::AiUse => "ai.use",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }

    /// Built-in matrix used when no override is stored.
    pub fn default_for(&self, role: UserRole) -> bool {
        match role {
            UserRole::SuperAdmin | UserRole::Admin => true,
            UserRole::Inspector => matches!(
                self,
                Permission::InspectionsRead
                    | Permission::InspectionsWrite
                    | Permission::ChecklistsRead
                    | Permission::ReportsRead
                    | Permission::AiUse
            ),
            UserRole::Viewer => matches!(
                self,
                Permission::InspectionsRead | Permission::ChecklistsRead | Permission::ReportsRead
            ),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RolePermissionEntity {
    pub role: UserRole,
    pub permission: String,
    pub enabled: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
