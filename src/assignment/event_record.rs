//! Conversion Event Record - a user action attributed to an experiment arm

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conversion Event represents a recorded user action.
///
/// Events are appended to the local debug log (bounded, newest kept) and
/// emitted to the analytics sink. This crate never queries them for analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversionEvent {
    experiment_id: String,
    variant_id: String,
    event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    timestamp: DateTime<Utc>,
}

impl ConversionEvent {
    /// Create a new conversion event stamped with the current time.
    #[must_use]
    pub fn new(
        experiment_id: impl Into<String>,
        variant_id: impl Into<String>,
        event_name: impl Into<String>,
        value: Option<f64>,
    ) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            variant_id: variant_id.into(),
            event_name: event_name.into(),
            value,
            timestamp: Utc::now(),
        }
    }

    /// Override the timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Get the experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the variant ID.
    #[must_use]
    pub fn variant_id(&self) -> &str {
        &self.variant_id
    }

    /// Get the event name.
    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Get the optional numeric value.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        self.value
    }

    /// Get the timestamp when the event was recorded.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
