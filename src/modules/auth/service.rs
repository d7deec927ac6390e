use std::sync::Arc;

use log::info;

use crate::{
    ENV,
    api::error,
    configs::RedisCache,
    modules::{
        auth::{
            model::{LoginQuery, SessionResponse},
            session::{AuthEvent, AuthEventWriter, SessionContext, SessionHub},
        },
        organization::service::OrganizationService,
        permission::service::PermissionService,
        user::{model::UpdateProfileModel, schema::UserEntity, service::UserService},
    },
    utils::Claims,
};

fn revoked_key(session_id: &uuid::Uuid) -> String {
    format!("revoked_session:{session_id}")
}

/// Builds OAuth authorize URLs for the hosted auth provider.
pub fn authorize_url(auth_url: &str, query: &LoginQuery) -> Result<String, error::SystemError> {
    let base = format!("{}/auth/v1/authorize", auth_url.trim_end_matches('/'));
    let mut params = vec![("provider", query.provider.as_str())];
    if let Some(redirect) = &query.redirect_to {
        params.push(("redirect_to", redirect.as_str()));
    }
    let url = reqwest::Url::parse_with_params(&base, &params)
        .map_err(|e| error::SystemError::bad_request(format!("Invalid auth URL: {e}")))?;
    Ok(url.to_string())
}

/// Owns session resolution and is the only publisher of auth events.
#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    organizations: OrganizationService,
    permissions: PermissionService,
    cache: Arc<RedisCache>,
    writer: Arc<AuthEventWriter>,
    hub: SessionHub,
}

impl AuthService {
    pub fn with_dependencies(
        users: UserService,
        organizations: OrganizationService,
        permissions: PermissionService,
        cache: Arc<RedisCache>,
    ) -> Self {
        let (writer, hub) = SessionHub::channel(256);
        info!("AuthService initialized with dependencies");
        AuthService { users, organizations, permissions, cache, writer: Arc::new(writer), hub }
    }

    pub fn hub(&self) -> SessionHub {
        self.hub.clone()
    }

    pub async fn resolve_session(
        &self,
        claims: Claims,
    ) -> Result<SessionContext, error::SystemError> {
        if let Some(session_id) = &claims.session_id {
            if self.cache.exists(&revoked_key(session_id)).await? {
                return Err(error::SystemError::unauthorized("Session has been signed out"));
            }
        }

        let profile = self.users.ensure_profile(claims.sub, claims.email.as_deref()).await?;
        let scope = self.organizations.resolve_scope(&profile).await?;
        Ok(SessionContext { claims, profile, scope })
    }

    pub fn login_url(&self, query: &LoginQuery) -> Result<String, error::SystemError> {
        authorize_url(&ENV.auth_url, query)
    }

    pub async fn bootstrap(
        &self,
        session: SessionContext,
    ) -> Result<SessionResponse, error::SystemError> {
        let permissions = self.permissions.enabled_for(session.role()).await?;
        self.writer.publish(AuthEvent::SignedIn {
            user_id: session.user_id(),
            at: chrono::Utc::now(),
        });
        Ok(SessionResponse {
            user: session.profile.into(),
            scope: session.scope,
            permissions,
            expires_at: session.claims.exp,
        })
    }

    pub async fn logout(&self, session: &SessionContext) -> Result<(), error::SystemError> {
        match &session.claims.session_id {
            Some(session_id) => {
                let ttl = session.claims.remaining_ttl();
                self.cache.set(&revoked_key(session_id), &session.user_id(), ttl).await?;
            }
            None => log::warn!("Token for user {} has no session id to revoke", session.user_id()),
        }
        self.users.evict(&session.user_id()).await?;
        self.writer.publish(AuthEvent::SignedOut {
            user_id: session.user_id(),
            at: chrono::Utc::now(),
        });
        info!("User {} signed out", session.user_id());
        Ok(())
    }

    pub async fn update_profile(
        &self,
        session: &SessionContext,
        model: UpdateProfileModel,
    ) -> Result<UserEntity, error::SystemError> {
        let user = self.users.update_profile(session.user_id(), model).await?;
        self.writer.publish(AuthEvent::ProfileUpdated {
            user_id: session.user_id(),
            at: chrono::Utc::now(),
        });
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_encodes_parameters() {
        let query = LoginQuery {
            provider: "google".into(),
            redirect_to: Some("http://localhost:5173/auth/callback?next=/inspections".into()),
        };
        let url = authorize_url("https://auth.example.com/", &query).unwrap();

        assert!(url.starts_with("https://auth.example.com/auth/v1/authorize?provider=google"));
        assert!(url.contains("redirect_to=http%3A%2F%2Flocalhost%3A5173%2Fauth%2Fcallback"));
    }

    #[test]
    fn authorize_url_without_redirect() {
        let query = LoginQuery { provider: "github".into(), redirect_to: None };
        let url = authorize_url("https://auth.example.com", &query).unwrap();
        assert_eq!(url, "https://auth.example.com/auth/v1/authorize?provider=github");
    }
}
