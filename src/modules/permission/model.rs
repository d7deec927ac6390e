use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::user::schema::UserRole;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PermissionToggle {
    pub role: UserRole,
    #[validate(length(min = 1, max = 64))]
    pub permission: String,
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePermissionsModel {
    #[validate(length(min = 1, max = 200))]
    #[validate(nested)]
    pub permissions: Vec<PermissionToggle>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RolePermissionResponse {
    pub role: UserRole,
    pub permission: &'static str,
    pub enabled: bool,
    /// False when the value comes from the built-in defaults.
    pub customized: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_are_validated_individually() {
        let model: UpdatePermissionsModel = serde_json::from_str(
            r#"{"permissions":[{"role":"viewer","permission":"","enabled":true}]}"#,
        )
        .unwrap();
        assert!(model.validate().is_err());

        let model: UpdatePermissionsModel = serde_json::from_str(
            r#"{"permissions":[{"role":"viewer","permission":"reports.read","enabled":true}]}"#,
        )
        .unwrap();
        assert!(model.validate().is_ok());
    }
}
