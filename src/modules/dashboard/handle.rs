use actix_web::{get, web};

use crate::{
    api::{error, success},
    modules::{
        auth::session::SessionContext,
        dashboard::{schema::DashboardStats, service::DashboardService},
    },
};

#[get("/stats")]
pub async fn get_stats(
    dashboard_service: web::Data<DashboardService>,
    session: SessionContext,
) -> Result<success::Success<DashboardStats>, error::Error> {
    let stats = dashboard_service.stats(&session).await?;
    Ok(success::Success::ok(Some(stats)).message("Dashboard statistics retrieved successfully"))
}
