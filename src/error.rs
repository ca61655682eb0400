//! Error types for trueno-ab
//!
//! Most runtime failures in this crate are absorbed (an experiment that cannot
//! be persisted behaves as unassigned). These variants surface at construction
//! time, from storage backends, and from analytics sinks.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// trueno-ab error types
#[derive(Error, Debug)]
pub enum Error {
    /// Two experiments in one registry share an id
    #[error("Duplicate experiment id: {0}\nExperiment ids must be unique within a registry")]
    DuplicateExperiment(String),

    /// Experiment has no variants to assign
    #[error("Experiment '{0}' has no variants")]
    EmptyExperiment(String),

    /// Variant weights do not sum to 1.0
    #[error("Variant weights for experiment '{experiment_id}' sum to {sum}, expected 1.0\nDraws above {sum} fall back to the first variant")]
    InvalidWeights {
        /// Offending experiment
        experiment_id: String,
        /// Actual weight sum
        sum: f64,
    },

    /// Storage backend error (quota, unavailable, ...)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Analytics sink rejected an event
    #[error("Analytics sink error: {0}")]
    SinkError(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
