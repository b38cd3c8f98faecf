//! Health plan listing.

use axum::Json;
use axum::extract::State;

use hr_core::HealthPlan;

use crate::state::AppState;

/// GET /api/health-plans: every plan offered.
pub async fn list_plans(State(state): State<AppState>) -> Json<Vec<HealthPlan>> {
    Json(state.conversation.agent().health_plans().to_vec())
}
