//! Experiment service: registry + repository + environment, and variant
//! resolution on top of them.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::assignment::{self, Assignment, ConversionEvent};
use crate::config::ServiceConfig;
use crate::environment::Environment;
use crate::experiment::{ExperimentRegistry, VariantId, DEFAULT_WEIGHT_TOLERANCE};
use crate::storage::{AssignmentRepository, StorageBackend, StorageRepository};

/// Assigns browsers to experiment variants and tracks their conversions.
///
/// Assignment happens once per experiment: the first [`get_variant`] for an
/// enabled experiment draws a variant by weight and persists it, every later
/// call returns the persisted one until [`clear_all_assignments`].
///
/// # Example
///
/// ```rust
/// use trueno_ab::{Environment, ExperimentService};
/// use trueno_ab::storage::{MemoryStorage, StorageRepository};
///
/// let service = ExperimentService::builder(StorageRepository::new(MemoryStorage::new()))
///     .environment(Environment::builder().persistent_storage(true).build())
///     .seed(7)
///     .build();
///
/// let variant = service.get_variant("hero-cta").unwrap();
/// assert!(variant == "control" || variant == "variant-a");
/// assert_eq!(service.get_variant("hero-cta"), Some(variant));
/// assert_eq!(service.get_variant("no-such-experiment"), None);
/// ```
///
/// [`get_variant`]: ExperimentService::get_variant
/// [`clear_all_assignments`]: ExperimentService::clear_all_assignments
#[derive(Debug)]
pub struct ExperimentService<R> {
    registry: ExperimentRegistry,
    repository: R,
    environment: Environment,
    config: ServiceConfig,
    rng: Mutex<StdRng>,
}

impl<S: StorageBackend> ExperimentService<StorageRepository<S>> {
    /// Service over a storage backend laid out per `config.storage`.
    #[must_use]
    pub fn from_config(
        backend: S,
        registry: ExperimentRegistry,
        environment: Environment,
        config: ServiceConfig,
    ) -> Self {
        let repository = StorageRepository::with_config(backend, config.storage.clone());
        Self::builder(repository)
            .registry(registry)
            .environment(environment)
            .config(config)
            .build()
    }
}

impl<R: AssignmentRepository> ExperimentService<R> {
    /// Create a builder around a repository.
    #[must_use]
    pub fn builder(repository: R) -> ExperimentServiceBuilder<R> {
        ExperimentServiceBuilder::new(repository)
    }

    /// Resolve the current browser's variant for an experiment.
    ///
    /// Returns `None` when the host has no persistent storage, or the
    /// experiment is unknown, disabled, or has no variants. Otherwise returns
    /// the persisted assignment, drawing and persisting one first if absent.
    pub fn get_variant(&self, experiment_id: &str) -> Option<VariantId> {
        if !self.environment.has_persistent_storage() {
            return None;
        }

        let experiment = self.registry.get(experiment_id)?;
        if !experiment.enabled() {
            return None;
        }

        if let Some(existing) = self.repository.find_assignment(experiment_id) {
            return Some(existing.variant_id().to_string());
        }

        let variant = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            assignment::assign_variant(experiment, &mut *rng)
        };
        let Some(variant) = variant else {
            warn!(experiment_id, "Experiment has no variants, leaving unassigned");
            return None;
        };

        self.repository.save_assignment(experiment_id, variant.id());
        debug!(experiment_id, variant_id = variant.id(), "Assigned experiment variant");
        Some(variant.id().to_string())
    }

    /// Whether the current browser is in `variant_id` of the experiment.
    pub fn is_variant(&self, experiment_id: &str, variant_id: &str) -> bool {
        self.get_variant(experiment_id).as_deref() == Some(variant_id)
    }

    /// Delete every assignment and the conversion log. The next
    /// [`get_variant`](Self::get_variant) re-draws.
    pub fn clear_all_assignments(&self) {
        if !self.environment.has_persistent_storage() {
            return;
        }
        self.repository.clear_all_assignments();
        debug!("Cleared all A/B test assignments");
    }

    /// Every persisted assignment.
    #[must_use]
    pub fn all_assignments(&self) -> Vec<Assignment> {
        if !self.environment.has_persistent_storage() {
            return Vec::new();
        }
        self.repository.get_assignments()
    }

    /// The local conversion debug log, oldest first.
    #[must_use]
    pub fn conversion_events(&self) -> Vec<ConversionEvent> {
        if !self.environment.has_persistent_storage() {
            return Vec::new();
        }
        self.repository.get_events()
    }

    /// Get the experiment registry.
    #[must_use]
    pub const fn registry(&self) -> &ExperimentRegistry {
        &self.registry
    }

    /// Get the repository.
    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Get the environment.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Builder for `ExperimentService`.
#[derive(Debug)]
pub struct ExperimentServiceBuilder<R> {
    repository: R,
    registry: Option<ExperimentRegistry>,
    environment: Option<Environment>,
    config: ServiceConfig,
    seed: Option<u64>,
}

impl<R: AssignmentRepository> ExperimentServiceBuilder<R> {
    /// Create a new builder. Defaults: built-in catalog, native environment,
    /// default configuration, entropy-seeded RNG.
    #[must_use]
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            registry: None,
            environment: None,
            config: ServiceConfig::default(),
            seed: None,
        }
    }

    /// Set the experiment registry.
    #[must_use]
    pub fn registry(mut self, registry: ExperimentRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the environment.
    #[must_use]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set the configuration.
    #[must_use]
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed the assignment RNG for reproducible draws.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the `ExperimentService`.
    ///
    /// Weight problems in the registry are logged, not rejected.
    #[must_use]
    pub fn build(self) -> ExperimentService<R> {
        let registry = self.registry.unwrap_or_else(ExperimentRegistry::default_catalog);
        for problem in registry.validate_weights(DEFAULT_WEIGHT_TOLERANCE) {
            warn!(%problem, "Experiment registry problem");
        }

        let rng = self
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        ExperimentService {
            registry,
            repository: self.repository,
            environment: self.environment.unwrap_or_else(Environment::native),
            config: self.config,
            rng: Mutex::new(rng),
        }
    }
}
