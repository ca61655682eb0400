//! Execution environment capabilities
//!
//! Whether persistent storage exists, whether an analytics sink is loaded, and
//! which execution mode is active are decided once by the host and handed to
//! the service, not probed ad hoc.

use std::fmt;
use std::sync::Arc;

use crate::analytics::AnalyticsSink;
use crate::config::ExecutionMode;

/// Capabilities of the host the service runs in.
#[derive(Clone, Default)]
pub struct Environment {
    persistent_storage: bool,
    analytics_sink: Option<Arc<dyn AnalyticsSink>>,
    mode: ExecutionMode,
}

impl Environment {
    /// Create a builder. Defaults: no storage, no sink, production.
    #[must_use]
    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::default()
    }

    /// Native host: persistent storage available, no sink, mode from
    /// `TRUENO_AB_MODE`.
    #[must_use]
    pub fn native() -> Self {
        Self::builder()
            .persistent_storage(true)
            .mode(ExecutionMode::from_env())
            .build()
    }

    /// Host with no storage and no sink, e.g. rendering before client
    /// hydration. Every experiment resolves to `None`.
    #[must_use]
    pub fn headless() -> Self {
        Self::default()
    }

    /// Whether assignments can be persisted.
    #[must_use]
    pub const fn has_persistent_storage(&self) -> bool {
        self.persistent_storage
    }

    /// Whether an analytics sink is loaded.
    #[must_use]
    pub const fn has_analytics_sink(&self) -> bool {
        self.analytics_sink.is_some()
    }

    /// The analytics sink, if loaded.
    #[must_use]
    pub fn analytics_sink(&self) -> Option<&dyn AnalyticsSink> {
        self.analytics_sink.as_deref()
    }

    /// The execution mode.
    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        self.mode
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("persistent_storage", &self.persistent_storage)
            .field("analytics_sink", &self.has_analytics_sink())
            .field("mode", &self.mode)
            .finish()
    }
}

/// Builder for `Environment`.
#[derive(Default)]
pub struct EnvironmentBuilder {
    persistent_storage: bool,
    analytics_sink: Option<Arc<dyn AnalyticsSink>>,
    mode: ExecutionMode,
}

impl EnvironmentBuilder {
    /// Declare whether persistent storage is available.
    #[must_use]
    pub const fn persistent_storage(mut self, available: bool) -> Self {
        self.persistent_storage = available;
        self
    }

    /// Attach an analytics sink.
    #[must_use]
    pub fn analytics_sink(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics_sink = Some(sink);
        self
    }

    /// Set the execution mode.
    #[must_use]
    pub const fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build the `Environment`.
    #[must_use]
    pub fn build(self) -> Environment {
        Environment {
            persistent_storage: self.persistent_storage,
            analytics_sink: self.analytics_sink,
            mode: self.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::RecordingSink;

    #[test]
    fn test_headless_has_nothing() {
        let env = Environment::headless();
        assert!(!env.has_persistent_storage());
        assert!(!env.has_analytics_sink());
        assert!(env.analytics_sink().is_none());
        assert_eq!(env.mode(), ExecutionMode::Production);
    }

    #[test]
    fn test_builder() {
        let env = Environment::builder()
            .persistent_storage(true)
            .analytics_sink(Arc::new(RecordingSink::new()))
            .mode(ExecutionMode::Development)
            .build();

        assert!(env.has_persistent_storage());
        assert!(env.has_analytics_sink());
        assert!(env.mode().is_development());
        assert!(format!("{env:?}").contains("analytics_sink: true"));
    }

    #[test]
    fn test_native_has_storage() {
        assert!(Environment::native().has_persistent_storage());
    }
}
