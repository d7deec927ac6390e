use std::sync::Arc;

use log::info;

use crate::{
    ENV,
    api::error,
    configs::RedisCache,
    modules::{
        auth::session::SessionContext,
        dashboard::{
            repository::DashboardRepository,
            schema::{DashboardStats, InspectionCounts},
        },
    },
};

/// Share of finished (completed or approved) inspections, as a percentage with one decimal.
pub fn completion_rate(counts: &InspectionCounts) -> f64 {
    if counts.total <= 0 {
        return 0.0;
    }
    let finished = (counts.completed + counts.approved) as f64;
    (finished / counts.total as f64 * 1000.0).round() / 10.0
}

#[derive(Clone)]
pub struct DashboardService {
    repo: Arc<dyn DashboardRepository + Send + Sync>,
    cache: Arc<RedisCache>,
}

impl DashboardService {
    pub fn with_dependencies(
        repo: Arc<dyn DashboardRepository + Send + Sync>,
        cache: Arc<RedisCache>,
    ) -> Self {
        info!("DashboardService initialized with dependencies");
        DashboardService { repo, cache }
    }

    pub async fn stats(
        &self,
        session: &SessionContext,
    ) -> Result<DashboardStats, error::SystemError> {
        let key = format!("dashboard:{}", session.scope.cache_key(session.user_id()));
        if let Some(cached) = self.cache.get::<DashboardStats>(&key).await? {
            return Ok(cached);
        }

        let filter = session.filter();
        let inspections = self.repo.inspection_counts(&filter).await?;
        let action_items = self.repo.action_item_counts(&filter).await?;
        let active_templates = self.repo.active_template_count(&filter).await?;

        let stats = DashboardStats {
            completion_rate: completion_rate(&inspections),
            inspections,
            action_items,
            active_templates,
            generated_at: chrono::Utc::now(),
        };
        self.cache.set(&key, &stats, ENV.dashboard_cache_ttl).await?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(total: i64, completed: i64, approved: i64) -> InspectionCounts {
        InspectionCounts { total, completed, approved, ..Default::default() }
    }

    #[test]
    fn no_inspections_means_zero_rate() {
        assert_eq!(completion_rate(&counts(0, 0, 0)), 0.0);
    }

    #[test]
    fn rate_counts_completed_and_approved() {
        assert_eq!(completion_rate(&counts(4, 1, 1)), 50.0);
        assert_eq!(completion_rate(&counts(3, 1, 0)), 33.3);
        assert_eq!(completion_rate(&counts(3, 2, 0)), 66.7);
        assert_eq!(completion_rate(&counts(5, 2, 3)), 100.0);
    }
}
