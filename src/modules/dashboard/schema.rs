use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct InspectionCounts {
    pub total: i64,
    pub draft: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub approved: i64,
    pub completed_last_30_days: i64,
}

#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize)]
pub struct ActionItemCounts {
    pub open: i64,
    pub critical: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub inspections: InspectionCounts,
    pub action_items: ActionItemCounts,
    pub active_templates: i64,
    pub completion_rate: f64,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
