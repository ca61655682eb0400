//! Experiment Registry - the catalog of experiments handed to the service

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::Experiment;
use crate::{Error, Result};

/// Weight sums within this distance of 1.0 are considered valid.
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 1e-6;

/// Immutable catalog of experiments.
///
/// Keeps declaration order for listing and an id index for O(1) lookup.
/// Built once and passed to `ExperimentService` as configuration.
#[derive(Debug, Clone, Default)]
pub struct ExperimentRegistry {
    experiments: Vec<Experiment>,
    index: FxHashMap<String, usize>,
}

#[derive(Deserialize)]
struct RegistryFile {
    experiments: Vec<Experiment>,
}

impl ExperimentRegistry {
    /// Build a registry from a list of experiments.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateExperiment` if two experiments share an id.
    pub fn new(experiments: Vec<Experiment>) -> Result<Self> {
        let mut index = FxHashMap::default();
        for (position, experiment) in experiments.iter().enumerate() {
            if index.insert(experiment.id().to_string(), position).is_some() {
                return Err(Error::DuplicateExperiment(experiment.id().to_string()));
            }
        }
        Ok(Self { experiments, index })
    }

    /// The built-in experiment catalog.
    #[must_use]
    pub fn default_catalog() -> Self {
        let experiments = vec![
            Experiment::builder("hero-cta", "Hero CTA Button Text")
                .variant("control", "Get Started Free", 0.5)
                .variant("variant-a", "Try Now - No Credit Card", 0.5)
                .build(),
            Experiment::builder("pricing-display", "Pricing Display Format")
                .target_url("/pricing")
                .variant("control", "Monthly Upfront", 0.5)
                .variant("variant-a", "Annual Savings", 0.5)
                .build(),
            Experiment::builder("social-proof", "Social Proof Notification")
                .variant("control", "Recent Activity", 0.33)
                .variant("variant-a", "User Count", 0.33)
                .variant("variant-b", "Testimonial", 0.34)
                .build(),
        ];
        let index = experiments
            .iter()
            .enumerate()
            .map(|(position, e)| (e.id().to_string(), position))
            .collect();
        Self { experiments, index }
    }

    /// Load a registry from JSON.
    ///
    /// Accepts either a bare array of experiments or an object with an
    /// `experiments` array.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` for malformed JSON and
    /// `Error::DuplicateExperiment` for repeated ids.
    pub fn from_json(json: &str) -> Result<Self> {
        let experiments = if json.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<Experiment>>(json)?
        } else {
            serde_json::from_str::<RegistryFile>(json)?.experiments
        };
        Self::new(experiments)
    }

    /// All experiments in declaration order.
    #[must_use]
    pub fn experiments(&self) -> &[Experiment] {
        &self.experiments
    }

    /// Look up an experiment by id.
    #[must_use]
    pub fn get(&self, experiment_id: &str) -> Option<&Experiment> {
        self.index
            .get(experiment_id)
            .and_then(|&position| self.experiments.get(position))
    }

    /// Experiments that are enabled and apply to a page path.
    pub fn active_for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Experiment> {
        self.experiments
            .iter()
            .filter(move |e| e.enabled() && e.targets(path))
    }

    /// Number of experiments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Check every experiment's variant weights.
    ///
    /// Weights are never normalized; a sum below 1.0 skews draws toward the
    /// first variant. Callers decide whether a problem is fatal.
    #[must_use]
    pub fn validate_weights(&self, tolerance: f64) -> Vec<Error> {
        self.experiments
            .iter()
            .filter_map(|experiment| {
                if experiment.variants().is_empty() {
                    return Some(Error::EmptyExperiment(experiment.id().to_string()));
                }
                let sum = experiment.weight_sum();
                ((sum - 1.0).abs() > tolerance).then(|| Error::InvalidWeights {
                    experiment_id: experiment.id().to_string(),
                    sum,
                })
            })
            .collect()
    }
}
