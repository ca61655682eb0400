//! Variant - one weighted arm of an experiment

use serde::{Deserialize, Serialize};

/// Identifier of a variant, unique within its experiment.
pub type VariantId = String;

/// Variant id conventionally used for the baseline arm.
pub const CONTROL: &str = "control";

/// One arm of an experiment.
///
/// `weight` is a fraction of 1.0 relative to the sibling variants of the same
/// experiment (e.g. `0.5` = 50% of fresh browsers).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    id: VariantId,
    name: String,
    weight: f64,
}

impl Variant {
    /// Create a new variant.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight,
        }
    }

    /// Get the variant ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the selection weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Weight as a whole percentage, for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn percentage(&self) -> i64 {
        (self.weight * 100.0).round() as i64
    }

    /// Whether this is the baseline arm.
    #[must_use]
    pub fn is_control(&self) -> bool {
        self.id == CONTROL
    }
}
