use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    api::error,
    modules::{
        permission::{
            model::{RolePermissionResponse, UpdatePermissionsModel},
            repository::PermissionRepository,
            schema::{Permission, RolePermissionEntity},
        },
        user::schema::UserRole,
    },
};

/// Full role × permission matrix with stored overrides applied over the defaults.
pub fn merge_matrix(stored: &[RolePermissionEntity]) -> Vec<RolePermissionResponse> {
    let overrides: HashMap<(UserRole, &str), bool> =
        stored.iter().map(|row| ((row.role, row.permission.as_str()), row.enabled)).collect();

    UserRole::ALL
        .into_iter()
        .flat_map(|role| {
            let overrides = &overrides;
            Permission::ALL.into_iter().map(move |permission| {
                if role == UserRole::SuperAdmin {
                    return RolePermissionResponse {
                        role,
                        permission: permission.as_str(),
                        enabled: true,
                        customized: false,
                    };
                }
                match overrides.get(&(role, permission.as_str())) {
                    Some(enabled) => RolePermissionResponse {
                        role,
                        permission: permission.as_str(),
                        enabled: *enabled,
                        customized: true,
                    },
                    None => RolePermissionResponse {
                        role,
                        permission: permission.as_str(),
                        enabled: permission.default_for(role),
                        customized: false,
                    },
                }
            })
        })
        .collect()
}

#[derive(Clone)]
pub struct PermissionService {
    repo: Arc<dyn PermissionRepository + Send + Sync>,
}

impl PermissionService {
    pub fn with_dependencies(repo: Arc<dyn PermissionRepository + Send + Sync>) -> Self {
        PermissionService { repo }
    }

    pub async fn has_permission(
        &self,
        role: UserRole,
        permission: Permission,
    ) -> Result<bool, error::SystemError> {
        if role == UserRole::SuperAdmin {
            return Ok(true);
        }
        let stored = self.repo.find(role, permission.as_str()).await?;
        Ok(stored.map(|row| row.enabled).unwrap_or_else(|| permission.default_for(role)))
    }

    pub async fn matrix(&self) -> Result<Vec<RolePermissionResponse>, error::SystemError> {
        let stored = self.repo.find_all().await?;
        Ok(merge_matrix(&stored))
    }

    pub async fn enabled_for(&self, role: UserRole) -> Result<Vec<Permission>, error::SystemError> {
        let matrix = self.matrix().await?;
        Ok(matrix
            .into_iter()
            .filter(|entry| entry.role == role && entry.enabled)
            .filter_map(|entry| Permission::parse(entry.permission))
            .collect())
    }

    pub async fn update(
        &self,
        model: UpdatePermissionsModel,
    ) -> Result<Vec<RolePermissionResponse>, error::SystemError> {
        let mut toggles = Vec::with_capacity(model.permissions.len());
        for toggle in model.permissions {
            if toggle.role == UserRole::SuperAdmin {
                return Err(error::SystemError::bad_request(
                    "Super admin permissions cannot be changed",
                ));
            }
            let permission = Permission::parse(&toggle.permission).ok_or_else(|| {
                let message = format!("Unknown permission '{}'", toggle.permission);
                error::SystemError::bad_request(message)
            })?;
            toggles.push((toggle.role, permission.as_str(), toggle.enabled));
        }

        self.repo.upsert_many(&toggles).await?;
        log::info!("Updated {} role permission(s)", toggles.len());
        self.matrix().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(role: UserRole, permission: &str, enabled: bool) -> RolePermissionEntity {
        RolePermissionEntity {
            role,
            permission: permission.into(),
            enabled,
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn matrix_covers_every_role_and_permission() {
        let matrix = merge_matrix(&[]);
        assert_eq!(matrix.len(), UserRole::ALL.len() * Permission::ALL.len());
        assert!(matrix.iter().all(|e| !e.customized));
    }

    #[test]
    fn overrides_replace_defaults() {
        let matrix = merge_matrix(&[
            stored(UserRole::Viewer, "inspections.write", true),
            stored(UserRole::Inspector, "ai.use", false),
        ]);

        let find = |role, permission: &str| {
            matrix.iter().find(|e| e.role == role && e.permission == permission).unwrap()
        };

        assert!(find(UserRole::Viewer, "inspections.write").enabled);
        assert!(find(UserRole::Viewer, "inspections.write").customized);
        assert!(!find(UserRole::Inspector, "ai.use").enabled);
        assert!(find(UserRole::Inspector, "reports.read").enabled);
    }

    #[test]
    fn super_admin_ignores_stored_rows() {
        let matrix = merge_matrix(&[stored(UserRole::SuperAdmin, "ai.use", false)]);
        let entry = matrix
            .iter()
            .find(|e| e.role == UserRole::SuperAdmin && e.permission == "ai.use")
            .unwrap();
        assert!(entry.enabled);
    }
}
