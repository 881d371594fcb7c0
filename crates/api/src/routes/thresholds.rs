//! Threshold Routes

use axum::{extract::State, Json};
use std::sync::Arc;
use vital_signs::ThresholdDefinition;

use crate::AppState;

/// Active reference ranges
pub async fn get_thresholds(State(state): State<Arc<AppState>>) -> Json<Vec<ThresholdDefinition>> {
    Json(state.table.iter().cloned().collect())
}
