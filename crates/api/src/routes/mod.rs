//! HTTP Routes

pub mod alerts;
pub mod thresholds;
pub mod vitals;
