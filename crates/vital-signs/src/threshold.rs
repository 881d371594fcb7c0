//! Threshold Tables for Range Checking

use crate::error::ThresholdError;
use crate::VitalType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Reference ranges for a single vital type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdDefinition {
    pub vital_type: VitalType,
    /// Human label used on alerts (e.g. "Systolic BP")
    pub label: String,
    /// Lower bound of the normal range
    pub min_value: f64,
    /// Upper bound of the normal range
    pub max_value: f64,
    pub warning_min: f64,
    pub warning_max: f64,
    pub critical_min: f64,
    pub critical_max: f64,
    /// Display unit
    pub unit: String,
}

impl ThresholdDefinition {
    /// Create a definition from its three nested ranges
    pub fn new(
        vital_type: VitalType,
        label: &str,
        normal: (f64, f64),
        warning: (f64, f64),
        critical: (f64, f64),
        unit: &str,
    ) -> Self {
        Self {
            vital_type,
            label: label.to_string(),
            min_value: normal.0,
            max_value: normal.1,
            warning_min: warning.0,
            warning_max: warning.1,
            critical_min: critical.0,
            critical_max: critical.1,
            unit: unit.to_string(),
        }
    }

    /// Bounds in ascending order, paired with their field names
    fn ordered_bounds(&self) -> [(&'static str, f64); 6] {
        [
            ("critical_min", self.critical_min),
            ("warning_min", self.warning_min),
            ("min_value", self.min_value),
            ("max_value", self.max_value),
            ("warning_max", self.warning_max),
            ("critical_max", self.critical_max),
        ]
    }

    /// Check `critical_min <= warning_min <= min_value <= max_value <= warning_max <= critical_max`
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let bounds = self.ordered_bounds();

        for (field, value) in bounds {
            if !value.is_finite() {
                return Err(ThresholdError::NonFinite {
                    vital: self.vital_type,
                    field,
                });
            }
        }

        for pair in bounds.windows(2) {
            let (lower, lower_value) = pair[0];
            let (upper, upper_value) = pair[1];
            if lower_value > upper_value {
                return Err(ThresholdError::OutOfOrder {
                    vital: self.vital_type,
                    lower,
                    lower_value,
                    upper,
                    upper_value,
                });
            }
        }

        Ok(())
    }

    /// Whether the value lies inside the normal range (inclusive)
    pub fn is_normal(&self, value: f64) -> bool {
        value >= self.min_value && value <= self.max_value
    }

    /// Whether the value lies inside the warning band (inclusive)
    pub fn in_warning_band(&self, value: f64) -> bool {
        value >= self.warning_min && value <= self.warning_max
    }

    fn apply(&mut self, over: &RangeOverride) {
        let fields = [
            (&mut self.min_value, over.min_value),
            (&mut self.max_value, over.max_value),
            (&mut self.warning_min, over.warning_min),
            (&mut self.warning_max, over.warning_max),
            (&mut self.critical_min, over.critical_min),
            (&mut self.critical_max, over.critical_max),
        ];
        for (slot, value) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
        if let Some(unit) = &over.unit {
            self.unit = unit.clone();
        }
    }
}

/// Partial replacement for one vital's bounds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeOverride {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub warning_min: Option<f64>,
    pub warning_max: Option<f64>,
    pub critical_min: Option<f64>,
    pub critical_max: Option<f64>,
    pub unit: Option<String>,
}

/// Per-vital overrides layered on top of the default table
///
/// Field names are snake_case so they survive case-folding config sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    pub heart_rate: Option<RangeOverride>,
    pub oxygen: Option<RangeOverride>,
    pub temperature: Option<RangeOverride>,
    pub blood_pressure_systolic: Option<RangeOverride>,
    pub blood_pressure_diastolic: Option<RangeOverride>,
}

impl ThresholdOverrides {
    /// Override for a given vital, if any
    pub fn get(&self, vital: VitalType) -> Option<&RangeOverride> {
        match vital {
            VitalType::HeartRate => self.heart_rate.as_ref(),
            VitalType::Oxygen => self.oxygen.as_ref(),
            VitalType::Temperature => self.temperature.as_ref(),
            VitalType::BloodPressureSystolic => self.blood_pressure_systolic.as_ref(),
            VitalType::BloodPressureDiastolic => self.blood_pressure_diastolic.as_ref(),
        }
    }
}

/// Validated, read-only mapping of vital type to reference ranges
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdTable {
    definitions: BTreeMap<VitalType, ThresholdDefinition>,
}

impl ThresholdTable {
    /// Build a table, validating every definition
    pub fn new(
        definitions: impl IntoIterator<Item = ThresholdDefinition>,
    ) -> Result<Self, ThresholdError> {
        let mut map = BTreeMap::new();
        for def in definitions {
            def.validate()?;
            let vital = def.vital_type;
            if map.insert(vital, def).is_some() {
                return Err(ThresholdError::Duplicate(vital));
            }
        }
        Ok(Self { definitions: map })
    }

    /// Default adult reference ranges
    pub fn standard() -> Self {
        Self {
            definitions: standard_definitions()
                .into_iter()
                .map(|d| (d.vital_type, d))
                .collect(),
        }
    }

    /// Default table with overrides applied, then re-validated
    pub fn with_overrides(overrides: &ThresholdOverrides) -> Result<Self, ThresholdError> {
        let definitions = standard_definitions().into_iter().map(|mut def| {
            if let Some(over) = overrides.get(def.vital_type) {
                debug!("Applying threshold override for {}", def.vital_type);
                def.apply(over);
            }
            def
        });
        Self::new(definitions)
    }

    /// Look up the definition for a vital type
    pub fn get(&self, vital: VitalType) -> Option<&ThresholdDefinition> {
        self.definitions.get(&vital)
    }

    /// Iterate definitions in vital-type order
    pub fn iter(&self) -> impl Iterator<Item = &ThresholdDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_definitions() -> Vec<ThresholdDefinition> {
    vec![
        ThresholdDefinition::new(
            VitalType::HeartRate,
            "Heart Rate",
            (60.0, 100.0),
            (50.0, 120.0),
            (40.0, 150.0),
            "bpm",
        ),
        ThresholdDefinition::new(
            VitalType::Oxygen,
            "Oxygen Saturation",
            (95.0, 100.0),
            (92.0, 100.0),
            (88.0, 100.0),
            "%",
        ),
        ThresholdDefinition::new(
            VitalType::Temperature,
            "Temperature",
            (36.1, 37.2),
            (35.5, 38.0),
            (35.0, 39.0),
            "°C",
        ),
        ThresholdDefinition::new(
            VitalType::BloodPressureSystolic,
            "Systolic BP",
            (90.0, 120.0),
            (85.0, 140.0),
            (70.0, 180.0),
            "mmHg",
        ),
        ThresholdDefinition::new(
            VitalType::BloodPressureDiastolic,
            "Diastolic BP",
            (60.0, 80.0),
            (55.0, 90.0),
            (40.0, 120.0),
            "mmHg",
        ),
    ]
}
