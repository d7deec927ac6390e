use actix_web::{HttpRequest, HttpResponse, get, post, web};
use actix_ws::Message;
use tokio::sync::broadcast::error::RecvError;

use crate::{
    api::{error, success},
    modules::auth::{
        model::{LoginQuery, LoginResponse, SessionResponse},
        service::AuthService,
        session::SessionContext,
    },
    utils::ValidatedQuery,
};

#[get("/auth/login")]
pub async fn login(
    auth_service: web::Data<AuthService>,
    query: ValidatedQuery<LoginQuery>,
) -> Result<success::Success<LoginResponse>, error::Error> {
    let url = auth_service.login_url(&query.0)?;
    Ok(success::Success::ok(Some(LoginResponse { url })).message("Redirect to provider"))
}

#[get("/session")]
pub async fn session_bootstrap(
    auth_service: web::Data<AuthService>,
    session: SessionContext,
) -> Result<success::Success<SessionResponse>, error::Error> {
    let response = auth_service.bootstrap(session).await?;
    Ok(success::Success::ok(Some(response)).message("Session established"))
}

#[post("/logout")]
pub async fn logout(
    auth_service: web::Data<AuthService>,
    session: SessionContext,
) -> Result<success::Success<()>, error::Error> {
    auth_service.logout(&session).await?;
    Ok(success::Success::no_content())
}

/// Streams the caller's auth-state changes over a WebSocket.
#[get("/events")]
pub async fn auth_events(
    req: HttpRequest,
    stream: web::Payload,
    auth_service: web::Data<AuthService>,
    session: SessionContext,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, stream)?;
    let mut events = auth_service.hub().subscribe();
    let user_id = session.user_id();

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                msg = msg_stream.recv() => {
                    match msg {
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = ws_session.pong(&data).await {
                                tracing::error!("Failed to send pong: {}", e);
                                break;
                            }
                        }
                        Some(Ok(Message::Close(reason))) => {
                            tracing::debug!("Auth event socket closed: {:?}", reason);
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::error!("WebSocket protocol error: {}", e);
                            break;
                        }
                        None => break,
                    }
                }

                event = events.recv() => {
                    match event {
                        Ok(event) if event.user_id() == user_id => {
                            let Ok(json) = serde_json::to_string(&event) else { continue };
                            if ws_session.text(json).await.is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(
                                "Auth event subscriber for {} lagged by {}",
                                user_id,
                                skipped
                            );
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        }

        let _ = ws_session.close(None).await;
        tracing::debug!("Auth event stream for {} ended", user_id);
    });

    Ok(response)
}
