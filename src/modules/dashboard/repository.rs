use crate::{
    api::error,
    modules::{
        dashboard::schema::{ActionItemCounts, InspectionCounts},
        organization::scope::ScopeFilter,
    },
};

#[async_trait::async_trait]
pub trait DashboardRepository {
    async fn inspection_counts(
        &self,
        scope: &ScopeFilter,
    ) -> Result<InspectionCounts, error::SystemError>;

    /// Unresolved action items on inspections in scope.
    async fn action_item_counts(
        &self,
        scope: &ScopeFilter,
    ) -> Result<ActionItemCounts, error::SystemError>;

    async fn active_template_count(&self, scope: &ScopeFilter) -> Result<i64, error::SystemError>;
}
