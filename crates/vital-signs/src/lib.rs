//! Vital Sign Classification
//!
//! Provides threshold tables, range classification, and blood pressure parsing
//! for patient vital signs.

mod blood_pressure;
mod classifier;
mod error;
mod threshold;
mod vital_type;

pub use blood_pressure::BloodPressure;
pub use classifier::{ClassificationResult, Direction, Severity, VitalClassifier, VitalStatus};
pub use error::{BloodPressureError, ThresholdError, UnknownVitalType};
pub use threshold::{RangeOverride, ThresholdDefinition, ThresholdOverrides, ThresholdTable};
pub use vital_type::VitalType;
