//! Vitals Alerting
//!
//! Turns patient readings into alert candidates, suppresses duplicates within a
//! cooldown window, and persists the survivors through an [`AlertSink`].

mod builder;
mod config;
mod dedup;
mod orchestrator;
mod reading;
mod sink;
mod source;

#[cfg(test)]
mod testing;

pub use builder::{
    AlertBuilder, AlertCandidate, BuildOutcome, UNASSIGNED_DOCTOR, UNKNOWN_PATIENT_ID,
    UNKNOWN_PATIENT_NAME,
};
pub use config::{AlertConfig, AlertConfigError};
pub use dedup::DedupGate;
pub use orchestrator::{AlertOrchestrator, EvaluationOutcome};
pub use reading::{PatientReading, ReadingField, ReadingValue, VitalAliases, SCALAR_VITALS};
pub use sink::{AlertSink, PersistedAlert, SinkError};
pub use source::{run_monitor, MonitorStats, VitalsSource};
