//! Storage Layer
//!
//! Provides an in-memory alert store behind the [`alerting::AlertSink`] contract.

mod repository;

pub use repository::{AlertFilter, AlertStore};

use alerting::SinkError;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
    #[error("Alert not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for SinkError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => SinkError::NotFound(id),
            other => SinkError::Storage(other.to_string()),
        }
    }
}
