//! Recognized vital types

use crate::error::UnknownVitalType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A vital sign the classifier has thresholds for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VitalType {
    HeartRate,
    Oxygen,
    Temperature,
    BloodPressureSystolic,
    BloodPressureDiastolic,
}

impl VitalType {
    /// Every recognized vital type, in display order
    pub const ALL: [VitalType; 5] = [
        VitalType::HeartRate,
        VitalType::Oxygen,
        VitalType::Temperature,
        VitalType::BloodPressureSystolic,
        VitalType::BloodPressureDiastolic,
    ];

    /// Wire name of the vital type
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalType::HeartRate => "heartRate",
            VitalType::Oxygen => "oxygen",
            VitalType::Temperature => "temperature",
            VitalType::BloodPressureSystolic => "bloodPressureSystolic",
            VitalType::BloodPressureDiastolic => "bloodPressureDiastolic",
        }
    }
}

impl fmt::Display for VitalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VitalType {
    type Err = UnknownVitalType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VitalType::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVitalType(s.to_string()))
    }
}
