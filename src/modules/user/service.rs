use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::ENV;
use crate::api::error;
use crate::configs::RedisCache;
use crate::modules::organization::scope::ScopeFilter;
use crate::modules::user::model::{
    AdminUpdateUserModel, InsertUser, UpdateProfileModel, UpdateUser, UserListQuery,
};
use crate::modules::user::repository::UserRepository;
use crate::modules::user::schema::{UserEntity, UserRole};

const DEFAULT_LIST_LIMIT: i64 = 100;

fn cache_key(id: &Uuid) -> String {
    format!("user:{id}")
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    cache: Arc<RedisCache>,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cache: Arc<RedisCache>,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cache }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserEntity, error::SystemError> {
        let key = cache_key(&id);
        if let Some(cached_user) = self.cache.get::<UserEntity>(&key).await? {
            return Ok(cached_user);
        }
        let user = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        self.cache.set(&key, &user, ENV.profile_cache_ttl).await?;
        Ok(user)
    }

    /// Looks up the profile for an authenticated subject, creating a viewer profile on first sight.
    pub async fn ensure_profile(
        &self,
        id: Uuid,
        email: Option<&str>,
    ) -> Result<UserEntity, error::SystemError> {
        match self.get_by_id(id).await {
            Ok(user) => return Ok(user),
            Err(error::SystemError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let email = email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                error::SystemError::unauthorized("Token carries no email for a new profile")
            })?;

        let user = self
            .repo
            .upsert(&InsertUser { id, email: email.to_string(), role: UserRole::Viewer })
            .await?;
        info!("Created profile for user {}", id);

        self.cache.set(&cache_key(&id), &user, ENV.profile_cache_ttl).await?;
        Ok(user)
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        model: UpdateProfileModel,
    ) -> Result<UserEntity, error::SystemError> {
        let update = UpdateUser {
            full_name: Some(model.full_name.trim().to_string()),
            role: None,
            organization_id: None,
        };
        let user = self.repo.update(&id, &update).await?;
        self.evict(&id).await?;
        Ok(user)
    }

    pub async fn admin_update(
        &self,
        actor_role: UserRole,
        id: Uuid,
        model: AdminUpdateUserModel,
    ) -> Result<UserEntity, error::SystemError> {
        if model.role.is_none() && model.organization_id.is_none() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }
        if model.role == Some(UserRole::SuperAdmin) && actor_role != UserRole::SuperAdmin {
            return Err(error::SystemError::forbidden("Only super admins can grant super admin"));
        }

        let update = UpdateUser {
            full_name: None,
            role: model.role,
            organization_id: model.organization_id,
        };
        let user = self.repo.update(&id, &update).await?;
        self.evict(&id).await?;
        Ok(user)
    }

    pub async fn list(
        &self,
        scope: &ScopeFilter,
        query: UserListQuery,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        self.repo.list(scope, query.role, query.limit.unwrap_or(DEFAULT_LIST_LIMIT)).await
    }

    pub async fn evict(&self, id: &Uuid) -> Result<(), error::SystemError> {
        self.cache.delete(&cache_key(id)).await
    }
}
