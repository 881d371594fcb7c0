//! Alert candidate building

use crate::reading::{PatientReading, SCALAR_VITALS};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vital_signs::{BloodPressure, Direction, Severity, VitalClassifier, VitalType};

/// Doctor id used when a patient has no assigned physician
pub const UNASSIGNED_DOCTOR: &str = "unassigned";

/// Name used when a reading carries none
pub const UNKNOWN_PATIENT_NAME: &str = "Unknown Patient";

/// Patient id recorded on alerts from a reading with no identity field
pub const UNKNOWN_PATIENT_ID: &str = "unknown";

/// An alert that has not yet been deduplicated or persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCandidate {
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub vital_type: VitalType,
    /// Human label, e.g. "Heart Rate"
    pub vital_name: String,
    pub current_value: f64,
    pub unit: String,
    pub severity: Severity,
    pub direction: Direction,
    pub message: String,
    /// Broadcast to all doctors rather than routed to one
    pub is_global: bool,
}

/// Result of checking one reading
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutcome {
    pub alerts: Vec<AlertCandidate>,
    pub checked: bool,
    /// `None` when the reading carries no `id`, `uid` or `phoneNumber`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

/// Identity fields shared by every candidate from one reading
struct PatientContext {
    patient_id: String,
    patient_name: String,
    doctor_id: String,
    is_global: bool,
}

/// Runs the classifier over each vital in a reading
#[derive(Debug, Clone, Default)]
pub struct AlertBuilder {
    classifier: VitalClassifier,
}

impl AlertBuilder {
    pub fn new(classifier: VitalClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &VitalClassifier {
        &self.classifier
    }

    /// Build alert candidates for every abnormal vital in the reading
    pub fn build(&self, reading: Option<&PatientReading>) -> BuildOutcome {
        let Some(reading) = reading else {
            return BuildOutcome::default();
        };

        let identity = reading.patient_id().map(str::to_string);
        let doctor_id = reading.doctor_id().unwrap_or(UNASSIGNED_DOCTOR).to_string();
        let ctx = PatientContext {
            patient_id: identity
                .clone()
                .unwrap_or_else(|| UNKNOWN_PATIENT_ID.to_string()),
            patient_name: reading
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN_PATIENT_NAME.to_string()),
            is_global: doctor_id == UNASSIGNED_DOCTOR,
            doctor_id,
        };

        let mut alerts = Vec::new();

        for aliases in &SCALAR_VITALS {
            let Some((field, raw)) = reading.lookup(aliases) else {
                continue;
            };
            match raw.as_f64() {
                Some(value) => alerts.extend(self.candidate(&ctx, aliases.vital, value)),
                None => warn!(
                    "Skipping {} for patient {}: {:?} field is not numeric",
                    aliases.vital, ctx.patient_id, field
                ),
            }
        }

        let bp_text = reading.blood_pressure.as_ref().and_then(|v| v.as_text());
        if let Some(bp) = BloodPressure::parse(bp_text) {
            alerts.extend(self.candidate(
                &ctx,
                VitalType::BloodPressureSystolic,
                bp.systolic as f64,
            ));
            alerts.extend(self.candidate(
                &ctx,
                VitalType::BloodPressureDiastolic,
                bp.diastolic as f64,
            ));
        } else if reading.blood_pressure.is_some() {
            debug!("Blood pressure for patient {} not parseable", ctx.patient_id);
        }

        BuildOutcome {
            alerts,
            checked: true,
            patient_id: identity,
            patient_name: Some(ctx.patient_name),
        }
    }

    fn candidate(&self, ctx: &PatientContext, vital: VitalType, value: f64) -> Option<AlertCandidate> {
        let result = self.classifier.classify(vital, value);
        let severity = result.alert_severity()?;
        let direction = result.direction?;
        let def = self.classifier.table().get(vital)?;

        Some(AlertCandidate {
            patient_id: ctx.patient_id.clone(),
            patient_name: ctx.patient_name.clone(),
            doctor_id: ctx.doctor_id.clone(),
            vital_type: vital,
            vital_name: def.label.clone(),
            current_value: value,
            unit: def.unit.clone(),
            severity,
            direction,
            message: result.message,
            is_global: ctx.is_global,
        })
    }
}
