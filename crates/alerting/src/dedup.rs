//! Cooldown-based alert deduplication

use crate::sink::{with_timeout, AlertSink};
use crate::AlertConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use vital_signs::VitalType;

/// Suppresses repeat alerts for the same patient and vital within a cooldown
///
/// Holds no alert history of its own; every decision is a query against the sink.
#[derive(Clone)]
pub struct DedupGate {
    sink: Arc<dyn AlertSink>,
    /// `None` when the configured cooldown is out of range
    cooldown: Option<chrono::Duration>,
    timeout: Duration,
}

impl DedupGate {
    pub fn new(sink: Arc<dyn AlertSink>, config: &AlertConfig) -> Self {
        Self {
            sink,
            cooldown: config.cooldown(),
            timeout: config.sink_timeout(),
        }
    }

    /// Whether an alert for this patient and vital already fired within the cooldown
    pub async fn should_suppress(&self, patient_id: &str, vital: VitalType) -> bool {
        self.should_suppress_at(patient_id, vital, Utc::now()).await
    }

    /// As [`should_suppress`](Self::should_suppress), relative to `now`
    ///
    /// A failed or timed-out query is treated as "no recent alert", as is a
    /// cooldown whose window start cannot be computed.
    pub async fn should_suppress_at(
        &self,
        patient_id: &str,
        vital: VitalType,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(since) = self.cooldown.and_then(|c| now.checked_sub_signed(c)) else {
            warn!(
                "Cooldown window out of range for patient {} {}, allowing alert",
                patient_id, vital
            );
            return false;
        };
        let query = self.sink.query_recent(patient_id, vital, since);

        match with_timeout(self.timeout, query).await {
            Ok(recent) if !recent.is_empty() => {
                debug!(
                    "Duplicate {} alert for patient {} ({} within cooldown)",
                    vital,
                    patient_id,
                    recent.len()
                );
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!(
                    "Dedup query failed for patient {} {}, allowing alert: {}",
                    patient_id, vital, e
                );
                metrics::counter!("vitals_sink_failures_total", "op" => "query_recent").increment(1);
                false
            }
        }
    }
}
