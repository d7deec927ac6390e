use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, HttpMessage, HttpRequest,
};
use futures_util::{future::LocalBoxFuture, FutureExt};
use std::rc::Rc;

use crate::{
    api::error,
    modules::{
        auth::{service::AuthService, session::SessionContext},
        permission::{schema::Permission, service::PermissionService},
        user::schema::UserRole,
    },
    utils::Claims,
    ENV,
};

/// Bearer header, or `access_token` in the query string for WebSocket upgrades.
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned);

    header.or_else(|| {
        web::Query::<std::collections::HashMap<String, String>>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.get("access_token").cloned())
    })
}

pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let token = match bearer_token(&req) {
        Some(t) => t,
        None => {
            return Err(error::Error::unauthorized("Token Invalid or Expired").into());
        }
    };

    let claims = Claims::decode(&token, ENV.jwt_secret.as_bytes(), ENV.jwt_audience.as_deref())
        .map_err(|_| error::Error::unauthorized("Token Invalid or Expired"))?;

    let auth_service = req
        .app_data::<web::Data<AuthService>>()
        .cloned()
        .ok_or(error::Error::InternalServer)?;

    let session = auth_service.resolve_session(claims).await.map_err(error::Error::from)?;
    req.extensions_mut().insert(session);

    next.call(req).await
}

pub fn get_session(req: &HttpRequest) -> Result<SessionContext, error::Error> {
    let extensions = req.extensions();

    let session = extensions
        .get::<SessionContext>()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized"))?
        .clone();

    Ok(session)
}

pub fn authorization<B>(
    allowed_roles: Vec<UserRole>,
) -> impl Fn(
    ServiceRequest,
    Next<B>,
) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, actix_web::Error>>
where
    B: MessageBody + 'static,
{
    let allowed_roles = Rc::new(allowed_roles);
    move |req: ServiceRequest, next: Next<B>| {
        let roles = allowed_roles.clone();
        async move {
            let role = get_session(req.request())?.role();

            if !roles.contains(&role) {
                return Err(error::Error::forbidden("No permission").into());
            }
            next.call(req).await
        }
        .boxed_local()
    }
}

pub fn require_permission<B>(
    permission: Permission,
) -> impl Fn(
    ServiceRequest,
    Next<B>,
) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, actix_web::Error>>
where
    B: MessageBody + 'static,
{
    move |req: ServiceRequest, next: Next<B>| {
        async move {
            let role = get_session(req.request())?.role();
            let permissions = req
                .app_data::<web::Data<PermissionService>>()
                .cloned()
                .ok_or(error::Error::InternalServer)?;

            let granted = permissions
                .has_permission(role, permission)
                .await
                .map_err(error::Error::from)?;

            if !granted {
                log::debug!("Role {:?} denied {}", role, permission.as_str());
                return Err(error::Error::forbidden(format!(
                    "Missing permission {}",
                    permission.as_str()
                ))
                .into());
            }
            next.call(req).await
        }
        .boxed_local()
    }
}
