//! Alert Routes

use alerting::PersistedAlert;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::AlertFilter;

use crate::error::ApiError;
use crate::AppState;

/// Response for alerts endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertResponse {
    pub data: Vec<PersistedAlert>,
    pub count: usize,
    pub unacknowledged_count: usize,
}

/// Body for the acknowledge endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeRequest {
    pub acknowledger_id: String,
    pub acknowledger_name: String,
}

/// List alerts, newest first
pub async fn get_alerts(
    State(state): State<Arc<AppState>>,
    Query(mut filter): Query<AlertFilter>,
) -> Result<Json<AlertResponse>, ApiError> {
    filter.limit = filter.limit.min(1000);
    let data = state.store.list(&filter)?;

    Ok(Json(AlertResponse {
        count: data.len(),
        unacknowledged_count: state.store.unacknowledged_count(),
        data,
    }))
}

/// Acknowledge an alert
pub async fn acknowledge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<AcknowledgeRequest>,
) -> Result<Json<PersistedAlert>, ApiError> {
    let alert = state
        .orchestrator
        .sink()
        .acknowledge(&id, &body.acknowledger_id, &body.acknowledger_name)
        .await?;
    Ok(Json(alert))
}
