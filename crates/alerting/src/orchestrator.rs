//! End-to-end evaluate-and-notify

use crate::builder::AlertBuilder;
use crate::dedup::DedupGate;
use crate::reading::PatientReading;
use crate::sink::{with_timeout, AlertSink, PersistedAlert};
use crate::AlertConfig;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use vital_signs::{ThresholdTable, VitalClassifier};

/// Summary of one evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOutcome {
    pub success: bool,
    pub message: String,
    pub alerts_created: usize,
    /// Candidates dropped as duplicates
    pub suppressed: usize,
    pub alerts: Vec<PersistedAlert>,
}

impl EvaluationOutcome {
    fn unchecked() -> Self {
        Self {
            success: false,
            message: "Unable to check vitals".to_string(),
            ..Default::default()
        }
    }

    fn all_normal() -> Self {
        Self {
            success: true,
            message: "All vitals normal".to_string(),
            ..Default::default()
        }
    }
}

/// Builds candidates, deduplicates them, and persists the rest
#[derive(Clone)]
pub struct AlertOrchestrator {
    builder: AlertBuilder,
    gate: DedupGate,
    sink: Arc<dyn AlertSink>,
    timeout: Duration,
}

impl AlertOrchestrator {
    /// Create an orchestrator over a shared threshold table and sink
    pub fn new(table: Arc<ThresholdTable>, sink: Arc<dyn AlertSink>, config: &AlertConfig) -> Self {
        info!(
            "Creating alert orchestrator (cooldown {}m, sink timeout {}ms)",
            config.cooldown_minutes, config.sink_timeout_ms
        );
        Self {
            builder: AlertBuilder::new(VitalClassifier::new(table)),
            gate: DedupGate::new(Arc::clone(&sink), config),
            sink,
            timeout: config.sink_timeout(),
        }
    }

    pub fn builder(&self) -> &AlertBuilder {
        &self.builder
    }

    pub fn sink(&self) -> &Arc<dyn AlertSink> {
        &self.sink
    }

    /// Evaluate a reading and persist any non-duplicate alerts
    ///
    /// Candidates are handled one at a time so that the dedup query and the
    /// write for one candidate complete before the next is checked. A failed
    /// write is logged and skipped; it never aborts the remaining candidates.
    pub async fn evaluate_and_alert(&self, reading: Option<&PatientReading>) -> EvaluationOutcome {
        metrics::counter!("vitals_readings_evaluated_total").increment(1);

        let checked = self.builder.build(reading);
        if !checked.checked {
            return EvaluationOutcome::unchecked();
        }
        if checked.alerts.is_empty() {
            return EvaluationOutcome::all_normal();
        }

        // Anonymous readings cannot be told apart, so none of them is ever a duplicate
        let identified = checked.patient_id.is_some();
        if !identified {
            debug!("Reading has no patient identity, skipping dedup");
        }

        let mut created = Vec::with_capacity(checked.alerts.len());
        let mut suppressed = 0;

        for candidate in &checked.alerts {
            if identified
                && self
                    .gate
                    .should_suppress(&candidate.patient_id, candidate.vital_type)
                    .await
            {
                debug!(
                    "Suppressed {} alert for patient {}",
                    candidate.vital_type, candidate.patient_id
                );
                metrics::counter!("vitals_alerts_suppressed_total").increment(1);
                suppressed += 1;
                continue;
            }

            match with_timeout(self.timeout, self.sink.persist(candidate)).await {
                Ok(alert) => {
                    info!(
                        "Alert {} created: {} {} for patient {} ({} {})",
                        alert.id,
                        candidate.severity,
                        candidate.vital_type,
                        candidate.patient_id,
                        candidate.current_value,
                        candidate.unit
                    );
                    metrics::counter!(
                        "vitals_alerts_created_total",
                        "severity" => candidate.severity.as_str()
                    )
                    .increment(1);
                    created.push(alert);
                }
                Err(e) => {
                    warn!(
                        "Failed to persist {} alert for patient {}: {}",
                        candidate.vital_type, candidate.patient_id, e
                    );
                    metrics::counter!("vitals_sink_failures_total", "op" => "persist").increment(1);
                }
            }
        }

        EvaluationOutcome {
            success: true,
            message: format!("Created {} alerts", created.len()),
            alerts_created: created.len(),
            suppressed,
            alerts: created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSink;
    use vital_signs::VitalType;

    fn orchestrator(sink: Arc<MockSink>) -> AlertOrchestrator {
        AlertOrchestrator::new(
            Arc::new(ThresholdTable::standard()),
            sink,
            &AlertConfig::default(),
        )
    }

    fn abnormal_reading() -> PatientReading {
        PatientReading {
            heart_rate: Some(150.0.into()),
            oxygen: Some(85.0.into()),
            temperature: Some(39.5.into()),
            blood_pressure: Some("180/120".into()),
            ..PatientReading::for_patient("p1")
        }
    }

    #[tokio::test]
    async fn test_absent_reading() {
        let sink = Arc::new(MockSink::default());
        let outcome = orchestrator(Arc::clone(&sink)).evaluate_and_alert(None).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Unable to check vitals");
        assert_eq!(sink.persist_calls(), 0);
    }

    #[tokio::test]
    async fn test_all_normal_skips_persist() {
        let sink = Arc::new(MockSink::default());
        let reading = PatientReading {
            heart_rate: Some(75.0.into()),
            oxygen: Some(98.0.into()),
            temperature: Some(36.5.into()),
            blood_pressure: Some("110/70".into()),
            ..PatientReading::for_patient("p1")
        };
        let outcome = orchestrator(Arc::clone(&sink))
            .evaluate_and_alert(Some(&reading))
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.message, "All vitals normal");
        assert_eq!(outcome.alerts_created, 0);
        assert_eq!(sink.persist_calls(), 0);
    }

    #[tokio::test]
    async fn test_creates_alerts() {
        let sink = Arc::new(MockSink::default());
        let outcome = orchestrator(Arc::clone(&sink))
            .evaluate_and_alert(Some(&abnormal_reading()))
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.alerts_created, 5);
        assert_eq!(outcome.message, "Created 5 alerts");
        assert_eq!(sink.stored().len(), 5);
        assert!(outcome.alerts.iter().all(|a| !a.acknowledged));
    }

    #[tokio::test]
    async fn test_second_evaluation_deduplicated() {
        let sink = Arc::new(MockSink::default());
        let orch = orchestrator(Arc::clone(&sink));
        orch.evaluate_and_alert(Some(&abnormal_reading())).await;

        let again = orch.evaluate_and_alert(Some(&abnormal_reading())).await;
        assert!(again.success);
        assert_eq!(again.alerts_created, 0);
        assert_eq!(again.suppressed, 5);
        assert_eq!(again.message, "Created 0 alerts");
        assert_eq!(sink.stored().len(), 5);
    }

    #[tokio::test]
    async fn test_write_failure_does_not_stop_others() {
        let sink = Arc::new(MockSink::default());
        sink.fail_persist_for(VitalType::Oxygen);
        let outcome = orchestrator(Arc::clone(&sink))
            .evaluate_and_alert(Some(&abnormal_reading()))
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.alerts_created, 4);
        assert_eq!(sink.persist_calls(), 5);
        assert!(outcome
            .alerts
            .iter()
            .all(|a| a.vital_type() != VitalType::Oxygen));
    }

    #[tokio::test]
    async fn test_anonymous_readings_never_deduplicated() {
        let sink = Arc::new(MockSink::default());
        let orch = orchestrator(Arc::clone(&sink));

        for name in ["Alice", "Bob"] {
            let reading = PatientReading {
                name: Some(name.to_string()),
                heart_rate: Some(35.0.into()),
                ..Default::default()
            };
            let outcome = orch.evaluate_and_alert(Some(&reading)).await;
            assert_eq!(outcome.alerts_created, 1, "{name}");
            assert_eq!(outcome.suppressed, 0, "{name}");
        }
        assert_eq!(sink.stored().len(), 2);
    }

    #[tokio::test]
    async fn test_query_failure_still_alerts() {
        let sink = Arc::new(MockSink::default());
        sink.fail_queries();
        let reading = PatientReading {
            heart_rate: Some(35.0.into()),
            ..PatientReading::for_patient("p1")
        };
        let outcome = orchestrator(Arc::clone(&sink))
            .evaluate_and_alert(Some(&reading))
            .await;
        assert_eq!(outcome.alerts_created, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_sink_times_out() {
        let sink = Arc::new(MockSink::default());
        sink.set_delay(Duration::from_secs(30));
        let reading = PatientReading {
            heart_rate: Some(35.0.into()),
            ..PatientReading::for_patient("p1")
        };
        let outcome = orchestrator(Arc::clone(&sink))
            .evaluate_and_alert(Some(&reading))
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.alerts_created, 0);
        assert_eq!(sink.persist_calls(), 1);
    }
}
