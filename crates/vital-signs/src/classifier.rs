//! Vital Classification against Threshold Tables

use crate::{ThresholdTable, VitalType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Outcome category of a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalStatus {
    Normal,
    Warning,
    Critical,
    Unknown,
}

/// How far a vital deviates from normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Whether this severity warrants an alert
    pub fn is_alertable(&self) -> bool {
        *self >= Severity::Warning
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the normal range an abnormal value lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Low,
    High,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Low => "low",
            Direction::High => "high",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one value
///
/// `severity` is `None` only when `status` is [`VitalStatus::Unknown`]; callers
/// must check the status before treating a missing severity as "no deviation".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub status: VitalStatus,
    pub severity: Option<Severity>,
    pub direction: Option<Direction>,
    pub message: String,
}

impl ClassificationResult {
    fn unknown() -> Self {
        Self {
            status: VitalStatus::Unknown,
            severity: None,
            direction: None,
            message: "Unknown vital type".to_string(),
        }
    }

    fn normal() -> Self {
        Self {
            status: VitalStatus::Normal,
            severity: Some(Severity::None),
            direction: None,
            message: "Within normal range".to_string(),
        }
    }

    fn warning(direction: Direction) -> Self {
        Self {
            status: VitalStatus::Warning,
            severity: Some(Severity::Warning),
            direction: Some(direction),
            message: format!("Slightly {} - monitor closely", direction),
        }
    }

    fn critical(direction: Direction) -> Self {
        Self {
            status: VitalStatus::Critical,
            severity: Some(Severity::Critical),
            direction: Some(direction),
            message: format!("Critically {} - immediate attention needed", direction),
        }
    }

    /// Severity if it warrants an alert
    pub fn alert_severity(&self) -> Option<Severity> {
        self.severity.filter(Severity::is_alertable)
    }
}

/// Classifies vital readings against a shared threshold table
#[derive(Debug, Clone)]
pub struct VitalClassifier {
    table: Arc<ThresholdTable>,
}

impl VitalClassifier {
    /// Create a classifier over a shared table
    pub fn new(table: Arc<ThresholdTable>) -> Self {
        Self { table }
    }

    /// The table this classifier reads
    pub fn table(&self) -> &ThresholdTable {
        &self.table
    }

    /// Classify a value for a vital type
    ///
    /// Normal range first, then warning-band membership, otherwise critical.
    /// Values between the warning and critical bounds are therefore critical.
    /// Warning direction compares against the normal minimum; critical
    /// direction compares against the critical minimum.
    pub fn classify(&self, vital: VitalType, value: f64) -> ClassificationResult {
        let Some(def) = self.table.get(vital) else {
            return ClassificationResult::unknown();
        };

        if def.is_normal(value) {
            ClassificationResult::normal()
        } else if def.in_warning_band(value) {
            let direction = if value < def.min_value {
                Direction::Low
            } else {
                Direction::High
            };
            ClassificationResult::warning(direction)
        } else {
            let direction = if value < def.critical_min {
                Direction::Low
            } else {
                Direction::High
            };
            ClassificationResult::critical(direction)
        }
    }

    /// Classify by wire name; unrecognized names yield [`VitalStatus::Unknown`]
    pub fn classify_named(&self, vital: &str, value: f64) -> ClassificationResult {
        match vital.parse::<VitalType>() {
            Ok(vital) => self.classify(vital, value),
            Err(_) => ClassificationResult::unknown(),
        }
    }
}

impl Default for VitalClassifier {
    fn default() -> Self {
        Self::new(Arc::new(ThresholdTable::standard()))
    }
}
