//! Raw patient readings as delivered by a vitals source

use serde::{Deserialize, Serialize};
use vital_signs::VitalType;

/// A raw field value; sources send numbers, numeric strings, or anything else
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl ReadingValue {
    /// Numeric value, parsing text as a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ReadingValue::Number(n) => Some(*n),
            ReadingValue::Text(s) => s.trim().parse().ok(),
            ReadingValue::Other(_) => None,
        }
    }

    /// Text value; numbers and other JSON values are not text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ReadingValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for ReadingValue {
    fn from(value: f64) -> Self {
        ReadingValue::Number(value)
    }
}

impl From<&str> for ReadingValue {
    fn from(value: &str) -> Self {
        ReadingValue::Text(value.to_string())
    }
}

/// Snapshot of one patient's vitals
///
/// Several fields are aliases for the same quantity; see [`SCALAR_VITALS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientReading {
    pub id: Option<String>,
    pub uid: Option<String>,
    pub phone_number: Option<String>,
    pub name: Option<String>,
    pub doctor_id: Option<String>,
    pub assigned_doctor: Option<String>,
    pub heart_rate: Option<ReadingValue>,
    pub bpm: Option<ReadingValue>,
    pub oxygen: Option<ReadingValue>,
    pub spo2: Option<ReadingValue>,
    pub temperature: Option<ReadingValue>,
    pub temp: Option<ReadingValue>,
    pub blood_pressure: Option<ReadingValue>,
}

/// Reading fields that can carry a scalar vital
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingField {
    HeartRate,
    Bpm,
    Oxygen,
    Spo2,
    Temperature,
    Temp,
}

/// Fields consulted for a vital, highest precedence first
#[derive(Debug, Clone, Copy)]
pub struct VitalAliases {
    pub vital: VitalType,
    pub fields: &'static [ReadingField],
}

/// Scalar vitals and their alias lookup order
pub const SCALAR_VITALS: [VitalAliases; 3] = [
    VitalAliases {
        vital: VitalType::HeartRate,
        fields: &[ReadingField::HeartRate, ReadingField::Bpm],
    },
    VitalAliases {
        vital: VitalType::Oxygen,
        fields: &[ReadingField::Oxygen, ReadingField::Spo2],
    },
    VitalAliases {
        vital: VitalType::Temperature,
        fields: &[ReadingField::Temperature, ReadingField::Temp],
    },
];

impl PatientReading {
    /// Create an empty reading for the given patient id
    pub fn for_patient(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Raw value of a single field
    pub fn field(&self, field: ReadingField) -> Option<&ReadingValue> {
        match field {
            ReadingField::HeartRate => self.heart_rate.as_ref(),
            ReadingField::Bpm => self.bpm.as_ref(),
            ReadingField::Oxygen => self.oxygen.as_ref(),
            ReadingField::Spo2 => self.spo2.as_ref(),
            ReadingField::Temperature => self.temperature.as_ref(),
            ReadingField::Temp => self.temp.as_ref(),
        }
    }

    /// First present field among the aliases, with the field it came from
    pub fn lookup(&self, aliases: &VitalAliases) -> Option<(ReadingField, &ReadingValue)> {
        aliases
            .fields
            .iter()
            .find_map(|&f| self.field(f).map(|v| (f, v)))
    }

    /// Patient identity: `id`, then `uid`, then `phone_number`
    pub fn patient_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.uid.as_deref())
            .or(self.phone_number.as_deref())
    }

    /// Responsible doctor: `doctor_id`, then `assigned_doctor`
    pub fn doctor_id(&self) -> Option<&str> {
        self.doctor_id.as_deref().or(self.assigned_doctor.as_deref())
    }
}
