use crate::modules::auth::handle::*;
use actix_web::web::{ServiceConfig, scope};

/// Registered outside any `/auth` scope so it does not shadow the guarded routes.
pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(login);
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/auth").service(session_bootstrap).service(logout).service(auth_events));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};

    #[actix_web::test]
    async fn session_routes_are_registered() {
        let app = test::init_service(App::new().service(scope("/api").configure(configure))).await;

        for (method, uri) in [
            (test::TestRequest::get(), "/api/auth/session"),
            (test::TestRequest::post(), "/api/auth/logout"),
        ] {
            let resp = test::call_service(&app, method.uri(uri).to_request()).await;
            assert_ne!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }
}
