//! Analytics sinks
//!
//! The service emits two actions: conversions and experiment views, each with
//! a property bag of category, composite label, and optional value. Where the
//! events go is up to the sink; in the browser it is the global `gtag`
//! function (see the `wasm` module).

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::Result;

/// Property bag attached to every emitted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventProperties {
    /// Event category, e.g. `"A/B Testing"`.
    #[serde(rename = "event_category")]
    pub category: String,
    /// `experimentId:variantId` for views, `experimentId:variantId:eventName`
    /// for conversions.
    #[serde(rename = "event_label")]
    pub label: String,
    /// Numeric value, conversions only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl EventProperties {
    /// Build a view label: `experimentId:variantId`.
    #[must_use]
    pub fn view_label(experiment_id: &str, variant_id: &str) -> String {
        format!("{experiment_id}:{variant_id}")
    }

    /// Build a conversion label: `experimentId:variantId:eventName`.
    #[must_use]
    pub fn conversion_label(experiment_id: &str, variant_id: &str, event_name: &str) -> String {
        format!("{experiment_id}:{variant_id}:{event_name}")
    }
}

/// Destination for analytics events.
///
/// Emission is fire-and-forget: the service logs a returned error and carries
/// on with its other side effects.
pub trait AnalyticsSink: Send + Sync {
    /// Emit one event.
    ///
    /// # Errors
    ///
    /// Returns `Error::SinkError` if the event could not be handed off.
    fn emit(&self, action: &str, properties: &EventProperties) -> Result<()>;
}

/// Sink that writes events as structured log records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn emit(&self, action: &str, properties: &EventProperties) -> Result<()> {
        info!(
            target: "trueno_ab::analytics",
            action,
            category = %properties.category,
            label = %properties.label,
            value = ?properties.value,
            "analytics event"
        );
        Ok(())
    }
}

/// One event captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    /// Action name.
    pub action: String,
    /// Properties as emitted.
    pub properties: EventProperties,
}

/// Sink that keeps every event in memory, for tests and debug panels.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of events emitted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if nothing has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnalyticsSink for RecordingSink {
    fn emit(&self, action: &str, properties: &EventProperties) -> Result<()> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedEvent {
                action: action.to_string(),
                properties: properties.clone(),
            });
        Ok(())
    }
}
