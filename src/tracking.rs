//! Conversion and view tracking
//!
//! A conversion has three independent side effects: analytics sink emission,
//! a local debug log entry, and (development only) a console line. A view
//! only reaches the sink and the console.

use tracing::{info, warn};

use crate::analytics::EventProperties;
use crate::assignment::ConversionEvent;
use crate::service::ExperimentService;
use crate::storage::AssignmentRepository;

/// Log target for the development console.
pub const CONSOLE_TARGET: &str = "trueno_ab::console";

impl<R: AssignmentRepository> ExperimentService<R> {
    /// Record a conversion for the current browser's variant.
    ///
    /// Resolves (and if needed assigns) the variant first; with no resolvable
    /// variant nothing is written or emitted. The sink receives `value`, or
    /// the configured default when `None`; the local log keeps `value` as
    /// given.
    pub fn track_conversion(&self, experiment_id: &str, event_name: &str, value: Option<f64>) {
        let Some(variant_id) = self.get_variant(experiment_id) else {
            return;
        };

        let event = ConversionEvent::new(experiment_id, &variant_id, event_name, value);
        let analytics = &self.config().analytics;

        if let Some(sink) = self.environment().analytics_sink() {
            let properties = EventProperties {
                category: analytics.category.clone(),
                label: EventProperties::conversion_label(experiment_id, &variant_id, event_name),
                value: Some(value.unwrap_or(analytics.default_conversion_value)),
            };
            if let Err(e) = sink.emit(&analytics.conversion_action, &properties) {
                warn!(experiment_id, event_name, error = %e, "Analytics sink rejected conversion");
            }
        }

        self.repository().append_event(event.clone());

        if self.environment().mode().is_development() {
            info!(
                target: CONSOLE_TARGET,
                experiment_id = event.experiment_id(),
                variant_id = event.variant_id(),
                event_name = event.event_name(),
                value = ?event.value(),
                timestamp = %event.timestamp(),
                "[A/B Test] Conversion"
            );
        }
    }

    /// Record that the current browser saw its variant of an experiment.
    ///
    /// Sink and console only; nothing is added to the local log.
    pub fn track_experiment_view(&self, experiment_id: &str) {
        let Some(variant_id) = self.get_variant(experiment_id) else {
            return;
        };

        let analytics = &self.config().analytics;
        if let Some(sink) = self.environment().analytics_sink() {
            let properties = EventProperties {
                category: analytics.category.clone(),
                label: EventProperties::view_label(experiment_id, &variant_id),
                value: None,
            };
            if let Err(e) = sink.emit(&analytics.view_action, &properties) {
                warn!(experiment_id, error = %e, "Analytics sink rejected view");
            }
        }

        if self.environment().mode().is_development() {
            info!(target: CONSOLE_TARGET, "[A/B Test] View: {experiment_id} -> {variant_id}");
        }
    }
}
