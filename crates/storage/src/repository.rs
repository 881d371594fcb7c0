//! Alert Store Implementation

use crate::StorageError;
use alerting::{AlertCandidate, AlertSink, PersistedAlert, SinkError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;
use vital_signs::{Severity, VitalType};

/// Filters for listing alerts
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFilter {
    pub patient_id: Option<String>,
    pub acknowledged: Option<bool>,
    pub severity: Option<Severity>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for AlertFilter {
    fn default() -> Self {
        Self {
            patient_id: None,
            acknowledged: None,
            severity: None,
            limit: default_limit(),
        }
    }
}

impl AlertFilter {
    fn matches(&self, alert: &PersistedAlert) -> bool {
        self.patient_id
            .as_deref()
            .map_or(true, |p| alert.patient_id() == p)
            && self.acknowledged.map_or(true, |a| alert.acknowledged == a)
            && self.severity.map_or(true, |s| alert.candidate.severity == s)
    }
}

/// Alert store (in-memory, insertion ordered)
pub struct AlertStore {
    alerts: Mutex<VecDeque<PersistedAlert>>,
    /// Oldest alerts are dropped beyond this many
    max_alerts: usize,
}

impl AlertStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::with_retention(10_000)
    }

    /// Create a store that keeps at most `max_alerts` records
    pub fn with_retention(max_alerts: usize) -> Self {
        info!("Creating in-memory alert store (retention {})", max_alerts);
        Self {
            alerts: Mutex::new(VecDeque::with_capacity(max_alerts.min(1000))),
            max_alerts: max_alerts.max(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, VecDeque<PersistedAlert>>, StorageError> {
        self.alerts
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }

    /// Insert an alert with an explicit creation time
    pub fn insert_at(
        &self,
        candidate: AlertCandidate,
        created_at: DateTime<Utc>,
    ) -> Result<PersistedAlert, StorageError> {
        let mut alerts = self.lock()?;

        // Enforce retention
        while alerts.len() >= self.max_alerts {
            alerts.pop_front();
        }

        let alert = PersistedAlert::new(Uuid::new_v4().to_string(), candidate, created_at);
        alerts.push_back(alert.clone());
        debug!("Inserted alert {}", alert.id);
        Ok(alert)
    }

    /// Newest-first alerts matching the filter
    pub fn list(&self, filter: &AlertFilter) -> Result<Vec<PersistedAlert>, StorageError> {
        let alerts = self.lock()?;
        Ok(alerts
            .iter()
            .rev()
            .filter(|a| filter.matches(a))
            .take(filter.limit)
            .cloned()
            .collect())
    }

    /// Look up a single alert
    pub fn get(&self, id: &str) -> Result<PersistedAlert, StorageError> {
        let alerts = self.lock()?;
        alerts
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    /// Alerts for the patient and vital created at or after `since`
    pub fn recent(
        &self,
        patient_id: &str,
        vital: VitalType,
        since: DateTime<Utc>,
    ) -> Result<Vec<PersistedAlert>, StorageError> {
        let alerts = self.lock()?;
        Ok(alerts
            .iter()
            .rev()
            .filter(|a| {
                a.created_at >= since && a.patient_id() == patient_id && a.vital_type() == vital
            })
            .cloned()
            .collect())
    }

    /// Mark an alert acknowledged
    pub fn acknowledge_at(
        &self,
        id: &str,
        by_id: &str,
        by_name: &str,
        at: DateTime<Utc>,
    ) -> Result<PersistedAlert, StorageError> {
        let mut alerts = self.lock()?;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        alert.acknowledge(by_id, by_name, at);
        info!("Alert {} acknowledged by {}", id, by_id);
        Ok(alert.clone())
    }

    /// Total alert count
    pub fn len(&self) -> usize {
        self.alerts.lock().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Alerts not yet acknowledged
    pub fn unacknowledged_count(&self) -> usize {
        self.alerts
            .lock()
            .map(|a| a.iter().filter(|a| !a.acknowledged).count())
            .unwrap_or(0)
    }
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertSink for AlertStore {
    async fn query_recent(
        &self,
        patient_id: &str,
        vital_type: VitalType,
        since: DateTime<Utc>,
    ) -> Result<Vec<PersistedAlert>, SinkError> {
        Ok(self.recent(patient_id, vital_type, since)?)
    }

    async fn persist(&self, candidate: &AlertCandidate) -> Result<PersistedAlert, SinkError> {
        Ok(self.insert_at(candidate.clone(), Utc::now())?)
    }

    async fn acknowledge(
        &self,
        alert_id: &str,
        acknowledger_id: &str,
        acknowledger_name: &str,
    ) -> Result<PersistedAlert, SinkError> {
        Ok(self.acknowledge_at(alert_id, acknowledger_id, acknowledger_name, Utc::now())?)
    }
}
