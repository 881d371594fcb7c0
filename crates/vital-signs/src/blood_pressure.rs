//! Blood Pressure String Parsing

use crate::error::BloodPressureError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// A systolic/diastolic pair in mmHg
///
/// No plausibility checks are applied; range checking is left to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: i64,
    pub diastolic: i64,
}

impl BloodPressure {
    /// Parse an optional `"<int>/<int>"` string, yielding `None` on any malformation
    pub fn parse(input: Option<&str>) -> Option<Self> {
        let raw = input?;
        match raw.parse() {
            Ok(bp) => Some(bp),
            Err(e) => {
                debug!("Ignoring blood pressure {:?}: {}", raw, e);
                None
            }
        }
    }
}

impl FromStr for BloodPressure {
    type Err = BloodPressureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separators = s.matches('/').count();
        if separators == 0 {
            return Err(BloodPressureError::MissingSeparator);
        }
        if separators > 1 {
            return Err(BloodPressureError::ExtraSeparators(separators));
        }

        let (systolic, diastolic) = s
            .split_once('/')
            .ok_or(BloodPressureError::MissingSeparator)?;

        Ok(Self {
            systolic: parse_component("systolic", systolic)?,
            diastolic: parse_component("diastolic", diastolic)?,
        })
    }
}

fn parse_component(side: &'static str, raw: &str) -> Result<i64, BloodPressureError> {
    raw.trim()
        .parse()
        .map_err(|_| BloodPressureError::InvalidComponent {
            side,
            value: raw.to_string(),
        })
}
