//! Assignment repository: the persistence contract the service depends on.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::StorageBackend;
use crate::assignment::{Assignment, ConversionEvent};
use crate::config::StorageConfig;
use crate::Result;

/// Persistence of assignments and the conversion debug log.
///
/// Implementations absorb their own failures: reads of unavailable or corrupt
/// data return empty, failed writes are logged and dropped. An experiment
/// whose assignment cannot be persisted simply re-draws on the next exposure.
pub trait AssignmentRepository {
    /// All persisted assignments, empty if none can be read.
    fn get_assignments(&self) -> Vec<Assignment>;

    /// Upsert: replace any assignment for `experiment_id` with a fresh one
    /// stamped now.
    fn save_assignment(&self, experiment_id: &str, variant_id: &str);

    /// Delete every assignment and the event log.
    fn clear_all_assignments(&self);

    /// The conversion debug log, oldest first.
    fn get_events(&self) -> Vec<ConversionEvent>;

    /// Append to the debug log, dropping the oldest entries past capacity.
    fn append_event(&self, event: ConversionEvent);

    /// Assignment for one experiment, if persisted.
    fn find_assignment(&self, experiment_id: &str) -> Option<Assignment> {
        self.get_assignments()
            .into_iter()
            .find(|a| a.experiment_id() == experiment_id)
    }
}

/// [`AssignmentRepository`] over a [`StorageBackend`].
///
/// Assignments and events live as two JSON arrays under the keys named in
/// [`StorageConfig`].
#[derive(Debug)]
pub struct StorageRepository<S> {
    backend: S,
    config: StorageConfig,
}

impl<S: StorageBackend> StorageRepository<S> {
    /// Create a repository with the default keys and log capacity.
    #[must_use]
    pub fn new(backend: S) -> Self {
        Self::with_config(backend, StorageConfig::default())
    }

    /// Create a repository with explicit keys and log capacity.
    #[must_use]
    pub const fn with_config(backend: S, config: StorageConfig) -> Self {
        Self { backend, config }
    }

    /// Get the underlying backend.
    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Get the storage configuration.
    #[must_use]
    pub const fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.backend.get_item(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        self.backend.set_item(key, &raw)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read_list(key).unwrap_or_else(|e| {
            debug!(key, error = %e, "Unreadable experiment data, treating as empty");
            Vec::new()
        })
    }
}

impl<S: StorageBackend> AssignmentRepository for StorageRepository<S> {
    fn get_assignments(&self) -> Vec<Assignment> {
        self.load(&self.config.assignments_key)
    }

    fn save_assignment(&self, experiment_id: &str, variant_id: &str) {
        let mut assignments = self.get_assignments();
        assignments.retain(|a| a.experiment_id() != experiment_id);
        assignments.push(Assignment::new(experiment_id, variant_id));

        if let Err(e) = self.write_list(&self.config.assignments_key, &assignments) {
            warn!(experiment_id, variant_id, error = %e, "Failed to save A/B test assignment");
        }
    }

    fn clear_all_assignments(&self) {
        for key in [&self.config.assignments_key, &self.config.events_key] {
            if let Err(e) = self.backend.remove_item(key) {
                warn!(key = %key, error = %e, "Failed to clear A/B test data");
            }
        }
    }

    fn get_events(&self) -> Vec<ConversionEvent> {
        self.load(&self.config.events_key)
    }

    fn append_event(&self, event: ConversionEvent) {
        let mut events = self.get_events();
        events.push(event);
        let overflow = events.len().saturating_sub(self.config.event_log_capacity);
        events.drain(..overflow);

        if let Err(e) = self.write_list(&self.config.events_key, &events) {
            warn!(error = %e, "Failed to track A/B test conversion");
        }
    }
}
