//! In-crate test doubles

use crate::builder::AlertCandidate;
use crate::sink::{AlertSink, PersistedAlert, SinkError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use vital_signs::{Direction, Severity, VitalType};

pub(crate) fn candidate(patient_id: &str, vital: VitalType, severity: Severity) -> AlertCandidate {
    AlertCandidate {
        patient_id: patient_id.to_string(),
        patient_name: "Test Patient".to_string(),
        doctor_id: "unassigned".to_string(),
        vital_type: vital,
        vital_name: vital.to_string(),
        current_value: 0.0,
        unit: String::new(),
        severity,
        direction: Direction::High,
        message: String::new(),
        is_global: true,
    }
}

/// Sink with scriptable failures
#[derive(Default)]
pub(crate) struct MockSink {
    alerts: Mutex<Vec<PersistedAlert>>,
    fail_queries: AtomicBool,
    fail_persist_for: Mutex<Vec<VitalType>>,
    delay: Mutex<Option<Duration>>,
    persist_calls: AtomicUsize,
}

impl MockSink {
    pub(crate) fn insert_at(&self, candidate: AlertCandidate, created_at: DateTime<Utc>) {
        let mut alerts = self.alerts.lock().unwrap();
        let id = format!("seed-{}", alerts.len());
        alerts.push(PersistedAlert::new(id, candidate, created_at));
    }

    pub(crate) fn fail_queries(&self) {
        self.fail_queries.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_persist_for(&self, vital: VitalType) {
        self.fail_persist_for.lock().unwrap().push(vital);
    }

    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub(crate) fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn stored(&self) -> Vec<PersistedAlert> {
        self.alerts.lock().unwrap().clone()
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AlertSink for MockSink {
    async fn query_recent(
        &self,
        patient_id: &str,
        vital_type: VitalType,
        since: DateTime<Utc>,
    ) -> Result<Vec<PersistedAlert>, SinkError> {
        self.pause().await;
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(SinkError::Unavailable("query disabled".to_string()));
        }
        Ok(self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| {
                a.patient_id() == patient_id && a.vital_type() == vital_type && a.created_at >= since
            })
            .cloned()
            .collect())
    }

    async fn persist(&self, candidate: &AlertCandidate) -> Result<PersistedAlert, SinkError> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.fail_persist_for.lock().unwrap().contains(&candidate.vital_type) {
            return Err(SinkError::Storage("write rejected".to_string()));
        }
        let mut alerts = self.alerts.lock().unwrap();
        let alert = PersistedAlert::new(format!("alert-{}", alerts.len()), candidate.clone(), Utc::now());
        alerts.push(alert.clone());
        Ok(alert)
    }

    async fn acknowledge(
        &self,
        alert_id: &str,
        acknowledger_id: &str,
        acknowledger_name: &str,
    ) -> Result<PersistedAlert, SinkError> {
        let mut alerts = self.alerts.lock().unwrap();
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == alert_id)
            .ok_or_else(|| SinkError::NotFound(alert_id.to_string()))?;
        alert.acknowledge(acknowledger_id, acknowledger_name, Utc::now());
        Ok(alert.clone())
    }
}
