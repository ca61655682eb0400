//! Service configuration
//!
//! Every field has a default matching the browser persistence layout, so an
//! empty JSON object is a valid configuration.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable selecting the execution mode.
pub const MODE_ENV_VAR: &str = "TRUENO_AB_MODE";

/// Default storage key for the assignment list.
///
/// Deployments that already hold assignments under a site-prefixed key
/// (e.g. `mysite_ab_tests`) set [`StorageConfig::assignments_key`] to it.
pub const DEFAULT_ASSIGNMENTS_KEY: &str = "ab_tests";

/// Default storage key for the conversion debug log.
pub const DEFAULT_EVENTS_KEY: &str = "ab_events";

/// Default number of conversion events kept in the debug log.
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 100;

/// Where assignments and events are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key holding the assignment list.
    pub assignments_key: String,
    /// Key holding the conversion debug log.
    pub events_key: String,
    /// Maximum number of events kept in the debug log.
    pub event_log_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            assignments_key: DEFAULT_ASSIGNMENTS_KEY.to_string(),
            events_key: DEFAULT_EVENTS_KEY.to_string(),
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
        }
    }
}

/// Names and defaults used when emitting to the analytics sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Event category attached to every emitted event.
    pub category: String,
    /// Action name for conversions.
    pub conversion_action: String,
    /// Action name for experiment views.
    pub view_action: String,
    /// Value reported for conversions tracked without one.
    pub default_conversion_value: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            category: "A/B Testing".to_string(),
            conversion_action: "ab_test_conversion".to_string(),
            view_action: "ab_test_view".to_string(),
            default_conversion_value: 1.0,
        }
    }
}

/// Top-level configuration for `ExperimentService`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Persistence layout.
    pub storage: StorageConfig,
    /// Analytics naming.
    pub analytics: AnalyticsConfig,
}

impl ServiceConfig {
    /// Parse configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` for malformed JSON and
    /// `Error::ConfigError` for invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, otherwise as
    /// [`ServiceConfig::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Check invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` when the two storage keys collide or a key
    /// is empty.
    pub fn validate(&self) -> Result<()> {
        let storage = &self.storage;
        if storage.assignments_key.is_empty() || storage.events_key.is_empty() {
            return Err(Error::ConfigError("storage keys must not be empty".into()));
        }
        if storage.assignments_key == storage.events_key {
            return Err(Error::ConfigError(format!(
                "assignments and events share the storage key '{}'",
                storage.assignments_key
            )));
        }
        Ok(())
    }
}

/// Execution mode. Development additionally logs every tracked event to the
/// development console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Local development
    Development,
    /// Deployed
    #[default]
    Production,
}

impl ExecutionMode {
    /// Read the mode from `TRUENO_AB_MODE`, defaulting to production when the
    /// variable is unset or unrecognised.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(MODE_ENV_VAR)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Get mode name as string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// Whether this is development mode.
    #[must_use]
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for ExecutionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(Error::ConfigError(format!("unknown execution mode '{other}'"))),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
