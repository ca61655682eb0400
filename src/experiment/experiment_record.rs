//! Experiment - a named A/B test with weighted variants

use serde::{Deserialize, Serialize};

use super::Variant;

/// Identifier of an experiment, unique within a registry.
pub type ExperimentId = String;

const fn enabled_by_default() -> bool {
    true
}

/// Experiment represents one A/B test.
///
/// Experiments are defined once (built-in catalog or JSON configuration) and
/// never mutated afterwards. Variants keep their declaration order, which the
/// weighted draw walks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    id: ExperimentId,
    name: String,
    variants: Vec<Variant>,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_url: Option<String>,
}

impl Experiment {
    /// Create an enabled experiment with the given variants.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, variants: Vec<Variant>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            variants,
            enabled: true,
            target_url: None,
        }
    }

    /// Create a builder for constructing an experiment with optional fields.
    #[must_use]
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> ExperimentBuilder {
        ExperimentBuilder::new(id, name)
    }

    /// Get the experiment ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the variants in declaration order.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// Look up a variant by ID.
    #[must_use]
    pub fn variant(&self, variant_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id() == variant_id)
    }

    /// Whether the experiment is live.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Get the target URL pattern, if any.
    #[must_use]
    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    /// Sum of all variant weights.
    #[must_use]
    pub fn weight_sum(&self) -> f64 {
        self.variants.iter().map(Variant::weight).sum()
    }

    /// Whether the experiment applies to a page path.
    ///
    /// No pattern matches every path. Otherwise the path must equal the
    /// pattern or extend it past a `/` boundary (`/pricing` matches
    /// `/pricing/team` but not `/pricingx`).
    #[must_use]
    pub fn targets(&self, path: &str) -> bool {
        let Some(pattern) = self.target_url.as_deref() else {
            return true;
        };
        let pattern = pattern.trim_end_matches('/');
        if pattern.is_empty() {
            return true;
        }
        match path.strip_prefix(pattern) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
            None => false,
        }
    }
}

/// Builder for `Experiment`.
#[derive(Debug)]
pub struct ExperimentBuilder {
    id: ExperimentId,
    name: String,
    variants: Vec<Variant>,
    enabled: bool,
    target_url: Option<String>,
}

impl ExperimentBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            variants: Vec::new(),
            enabled: true,
            target_url: None,
        }
    }

    /// Append a variant.
    #[must_use]
    pub fn variant(mut self, id: impl Into<String>, name: impl Into<String>, weight: f64) -> Self {
        self.variants.push(Variant::new(id, name, weight));
        self
    }

    /// Enable or disable the experiment.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Restrict the experiment to pages under a URL pattern.
    #[must_use]
    pub fn target_url(mut self, target_url: impl Into<String>) -> Self {
        self.target_url = Some(target_url.into());
        self
    }

    /// Build the `Experiment`.
    #[must_use]
    pub fn build(self) -> Experiment {
        Experiment {
            id: self.id,
            name: self.name,
            variants: self.variants,
            enabled: self.enabled,
            target_url: self.target_url,
        }
    }
}
