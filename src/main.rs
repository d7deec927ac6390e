use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{RedisCache, connect_database},
    middlewares::authentication,
    modules::{
        ai::{
            client::{AiClient, HttpAiClient},
            repository_pg::AssistantRepositoryPg,
            service::AiService,
        },
        auth::service::AuthService,
        checklist::{repository_pg::ChecklistRepositoryPg, service::ChecklistService},
        dashboard::{repository_pg::DashboardRepositoryPg, service::DashboardService},
        inspection::{repository_pg::InspectionRepositoryPg, service::InspectionService},
        organization::{repository_pg::OrganizationRepositoryPg, service::OrganizationService},
        permission::{repository_pg::PermissionRepositoryPg, service::PermissionService},
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check(db_pool: web::Data<sqlx::PgPool>) -> &'static str {
    match sqlx::query("SELECT 1").execute(db_pool.get_ref()).await {
        Ok(_) => "Server is running",
        Err(e) => {
            log::error!("Health check query failed: {e}");
            "Server is running; database unreachable"
        }
    }
}

fn ai_client() -> std::io::Result<Option<Arc<dyn AiClient + Send + Sync>>> {
    let Some(url) = ENV.ai_api_url.as_deref() else {
        return Ok(None);
    };
    let client = HttpAiClient::new(url, ENV.ai_api_key.clone())
        .map_err(|_| std::io::Error::other("AI client initialization error"))?;
    log::info!("AI service configured at {url}");
    Ok(Some(Arc::new(client)))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let redis_pool = Arc::new(
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?,
    );
    let ai = ai_client()?;

    let user_service = UserService::with_dependencies(
        Arc::new(UserRepositoryPg::new(db_pool.clone())),
        redis_pool.clone(),
    );
    let organization_service = OrganizationService::with_dependencies(Arc::new(
        OrganizationRepositoryPg::new(db_pool.clone()),
    ));
    let permission_service = PermissionService::with_dependencies(Arc::new(
        PermissionRepositoryPg::new(db_pool.clone()),
    ));
    let auth_service = AuthService::with_dependencies(
        user_service.clone(),
        organization_service.clone(),
        permission_service.clone(),
        redis_pool.clone(),
    );
    let checklist_service = ChecklistService::with_dependencies(
        Arc::new(ChecklistRepositoryPg::new(db_pool.clone())),
        ai.clone(),
    );
    let inspection_service = InspectionService::with_dependencies(
        Arc::new(InspectionRepositoryPg::new(db_pool.clone())),
        checklist_service.clone(),
    );
    let dashboard_service = DashboardService::with_dependencies(
        Arc::new(DashboardRepositoryPg::new(db_pool.clone())),
        redis_pool.clone(),
    );
    let ai_service = AiService::with_dependencies(
        Arc::new(AssistantRepositoryPg::new(db_pool.clone())),
        inspection_service.clone(),
        ai,
    );

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allowed_origin(&ENV.frontend_url)
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials()
                    .max_age(3600),
            )
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(organization_service.clone()))
            .app_data(web::Data::new(permission_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(checklist_service.clone()))
            .app_data(web::Data::new(inspection_service.clone()))
            .app_data(web::Data::new(dashboard_service.clone()))
            .app_data(web::Data::new(ai_service.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .service(
                web::scope("/api").configure(modules::auth::route::public_api_configure).service(
                    web::scope("")
                        .wrap(from_fn(authentication))
                        .configure(modules::auth::route::configure)
                        .configure(modules::user::route::configure)
                        .configure(modules::organization::route::configure)
                        .configure(modules::permission::route::configure)
                        .configure(modules::checklist::route::configure)
                        .configure(modules::inspection::route::configure)
                        .configure(modules::dashboard::route::configure)
                        .configure(modules::ai::route::configure)
                        .configure(modules::media::route::configure),
                ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
