//! Vitals sources and the monitoring loop

use crate::orchestrator::AlertOrchestrator;
use crate::reading::PatientReading;
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Delivers patient readings one snapshot at a time
#[async_trait]
pub trait VitalsSource: Send {
    /// Next reading, or `None` once the source is exhausted
    async fn next_reading(&mut self) -> Option<PatientReading>;
}

#[async_trait]
impl VitalsSource for mpsc::Receiver<PatientReading> {
    async fn next_reading(&mut self) -> Option<PatientReading> {
        self.recv().await
    }
}

/// Totals accumulated by [`run_monitor`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStats {
    pub readings: usize,
    pub alerts_created: usize,
    pub suppressed: usize,
}

/// Evaluate every reading from the source until it is exhausted
pub async fn run_monitor<S>(source: &mut S, orchestrator: &AlertOrchestrator) -> MonitorStats
where
    S: VitalsSource + ?Sized,
{
    let mut stats = MonitorStats::default();

    while let Some(reading) = source.next_reading().await {
        let outcome = orchestrator.evaluate_and_alert(Some(&reading)).await;
        stats.readings += 1;
        stats.alerts_created += outcome.alerts_created;
        stats.suppressed += outcome.suppressed;
        debug!(
            "Reading for {} evaluated: {}",
            reading.patient_id().unwrap_or("unknown"),
            outcome.message
        );
    }

    info!(
        "Vitals source exhausted after {} readings ({} alerts, {} suppressed)",
        stats.readings, stats.alerts_created, stats.suppressed
    );
    stats
}
