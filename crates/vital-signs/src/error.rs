//! Vital Sign Error Types

use crate::VitalType;
use thiserror::Error;

/// Errors while building a threshold table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    /// Two adjacent bounds are out of order
    #[error("{vital} thresholds out of order: {lower} ({lower_value}) > {upper} ({upper_value})")]
    OutOfOrder {
        vital: VitalType,
        lower: &'static str,
        lower_value: f64,
        upper: &'static str,
        upper_value: f64,
    },

    /// A bound is NaN or infinite
    #[error("{vital} threshold {field} is not a finite number")]
    NonFinite { vital: VitalType, field: &'static str },

    /// The same vital type was defined twice
    #[error("Duplicate threshold definition for {0}")]
    Duplicate(VitalType),
}

/// Errors while parsing a "systolic/diastolic" string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BloodPressureError {
    /// No '/' separator present
    #[error("Missing '/' separator")]
    MissingSeparator,

    /// More than one '/' separator present
    #[error("Expected exactly one '/' separator, found {0}")]
    ExtraSeparators(usize),

    /// A side is not an integer
    #[error("Invalid {side} component: {value:?}")]
    InvalidComponent { side: &'static str, value: String },
}

/// A vital type name that is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown vital type: {0}")]
pub struct UnknownVitalType(pub String);
