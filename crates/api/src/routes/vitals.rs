//! Vitals Routes

use alerting::{EvaluationOutcome, PatientReading};
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Evaluate a reading synchronously and return the outcome
///
/// A `null` body is accepted and reported as unchecked.
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    Json(reading): Json<Option<PatientReading>>,
) -> Json<EvaluationOutcome> {
    Json(state.orchestrator.evaluate_and_alert(reading.as_ref()).await)
}

/// Queue a reading for the background monitor
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(reading): Json<PatientReading>,
) -> Result<StatusCode, ApiError> {
    let patient = reading.patient_id().unwrap_or("unknown").to_string();
    state.ingest.try_send(reading).map_err(|e| match e {
        TrySendError::Full(_) => ApiError::QueueFull,
        TrySendError::Closed(_) => ApiError::QueueClosed,
    })?;
    metrics::counter!("vitals_readings_queued_total").increment(1);
    debug!("Queued reading for patient {}", patient);
    Ok(StatusCode::ACCEPTED)
}
