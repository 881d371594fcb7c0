//! Alert sink contract

use crate::builder::AlertCandidate;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use vital_signs::VitalType;

/// Sink errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
    #[error("Alert not found: {0}")]
    NotFound(String),
    #[error("Sink call timed out after {0}ms")]
    Timeout(u64),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// An alert as stored by the sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAlert {
    pub id: String,
    #[serde(flatten)]
    pub candidate: AlertCandidate,
    pub acknowledged: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub acknowledged_by: Option<String>,
    pub acknowledged_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PersistedAlert {
    /// A freshly created, unacknowledged alert
    pub fn new(id: impl Into<String>, candidate: AlertCandidate, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            candidate,
            acknowledged: false,
            acknowledged_at: None,
            acknowledged_by: None,
            acknowledged_by_name: None,
            created_at,
        }
    }

    /// Mark acknowledged by the given user
    pub fn acknowledge(&mut self, by_id: &str, by_name: &str, at: DateTime<Utc>) {
        self.acknowledged = true;
        self.acknowledged_at = Some(at);
        self.acknowledged_by = Some(by_id.to_string());
        self.acknowledged_by_name = Some(by_name.to_string());
    }

    pub fn patient_id(&self) -> &str {
        &self.candidate.patient_id
    }

    pub fn vital_type(&self) -> VitalType {
        self.candidate.vital_type
    }
}

/// Durable store for alerts
///
/// Implementations must be safe to share across concurrent evaluations.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Alerts for the patient and vital created at or after `since`
    async fn query_recent(
        &self,
        patient_id: &str,
        vital_type: VitalType,
        since: DateTime<Utc>,
    ) -> Result<Vec<PersistedAlert>, SinkError>;

    /// Store a new alert
    async fn persist(&self, candidate: &AlertCandidate) -> Result<PersistedAlert, SinkError>;

    /// Record that a clinician has seen the alert
    async fn acknowledge(
        &self,
        alert_id: &str,
        acknowledger_id: &str,
        acknowledger_name: &str,
    ) -> Result<PersistedAlert, SinkError>;
}

/// Bound a sink call; elapsed time counts as a sink failure
pub(crate) async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, SinkError>
where
    F: Future<Output = Result<T, SinkError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| SinkError::Timeout(limit.as_millis() as u64))?
}
