//! Assignment Record - the durable binding of a browser to one variant

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Assignment binds the current browser to one variant of one experiment.
///
/// At most one assignment exists per experiment in a store. It is never
/// updated in place: a save replaces it, a clear removes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    experiment_id: String,
    variant_id: String,
    assigned_at: DateTime<Utc>,
}

impl Assignment {
    /// Create a new assignment stamped with the current time.
    #[must_use]
    pub fn new(experiment_id: impl Into<String>, variant_id: impl Into<String>) -> Self {
        Self::at(experiment_id, variant_id, Utc::now())
    }

    /// Create an assignment with an explicit timestamp (useful for testing).
    #[must_use]
    pub fn at(
        experiment_id: impl Into<String>,
        variant_id: impl Into<String>,
        assigned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            variant_id: variant_id.into(),
            assigned_at,
        }
    }

    /// Get the experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the assigned variant ID.
    #[must_use]
    pub fn variant_id(&self) -> &str {
        &self.variant_id
    }

    /// Get the assignment timestamp.
    #[must_use]
    pub const fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }
}
