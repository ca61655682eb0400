//! UI binding for a single experiment.
//!
//! A binding starts out loading. Mounting it resolves the variant (assigning
//! one if needed) and fires the view event, exactly once; re-mounting or
//! re-rendering never re-resolves. Until then callers should render their
//! default, variant-agnostic UI.
//!
//! ```rust
//! use trueno_ab::{Environment, ExperimentService};
//! use trueno_ab::storage::{MemoryStorage, StorageRepository};
//!
//! let service = ExperimentService::builder(StorageRepository::new(MemoryStorage::new()))
//!     .environment(Environment::builder().persistent_storage(true).build())
//!     .build();
//!
//! let mut cta = service.binding("hero-cta");
//! assert!(cta.is_loading());
//!
//! cta.mount();
//! let label = if cta.is_variant("variant-a") {
//!     "Try Now - No Credit Card"
//! } else {
//!     "Get Started Free"
//! };
//! assert!(!label.is_empty());
//!
//! let on_click = cta.conversion_tracker();
//! on_click("hero_cta_click", None);
//! assert_eq!(service.conversion_events().len(), 1);
//! ```

use crate::experiment::CONTROL;
use crate::service::ExperimentService;
use crate::storage::AssignmentRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
enum BindingState {
    Loading,
    Resolved(Option<String>),
}

/// Mount-once view of one experiment for UI code.
#[derive(Debug)]
pub struct ExperimentBinding<'s, R> {
    service: &'s ExperimentService<R>,
    experiment_id: String,
    state: BindingState,
}

impl<R: AssignmentRepository> ExperimentService<R> {
    /// Create an unmounted binding for an experiment.
    #[must_use]
    pub fn binding(&self, experiment_id: impl Into<String>) -> ExperimentBinding<'_, R> {
        ExperimentBinding::new(self, experiment_id)
    }
}

impl<'s, R: AssignmentRepository> ExperimentBinding<'s, R> {
    /// Create an unmounted binding.
    #[must_use]
    pub fn new(service: &'s ExperimentService<R>, experiment_id: impl Into<String>) -> Self {
        Self {
            service,
            experiment_id: experiment_id.into(),
            state: BindingState::Loading,
        }
    }

    /// Resolve the variant and track the view. Only the first call has any
    /// effect.
    pub fn mount(&mut self) -> Option<&str> {
        if self.state == BindingState::Loading {
            let variant = self.service.get_variant(&self.experiment_id);
            if variant.is_some() {
                self.service.track_experiment_view(&self.experiment_id);
            }
            self.state = BindingState::Resolved(variant);
        }
        self.variant()
    }

    /// The experiment this binding is for.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// The resolved variant; `None` while loading or when unassignable.
    #[must_use]
    pub fn variant(&self) -> Option<&str> {
        match &self.state {
            BindingState::Resolved(variant) => variant.as_deref(),
            BindingState::Loading => None,
        }
    }

    /// Whether `mount` has not run yet.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state == BindingState::Loading
    }

    /// Whether the resolved variant is `variant_id`.
    #[must_use]
    pub fn is_variant(&self, variant_id: &str) -> bool {
        self.variant() == Some(variant_id)
    }

    /// Whether a non-control variant resolved.
    #[must_use]
    pub fn is_treatment(&self) -> bool {
        self.variant().is_some_and(|v| v != CONTROL)
    }

    /// Track a conversion for this experiment.
    pub fn track_conversion(&self, event_name: &str, value: Option<f64>) {
        self.service
            .track_conversion(&self.experiment_id, event_name, value);
    }

    /// A conversion tracker bound to this experiment, for event handlers.
    pub fn conversion_tracker(&self) -> impl Fn(&str, Option<f64>) + 's {
        let service = self.service;
        let experiment_id = self.experiment_id.clone();
        move |event_name, value| service.track_conversion(&experiment_id, event_name, value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analytics::RecordingSink;
    use crate::environment::Environment;
    use crate::storage::{MemoryStorage, StorageRepository};

    fn service(sink: Arc<RecordingSink>) -> ExperimentService<StorageRepository<MemoryStorage>> {
        ExperimentService::builder(StorageRepository::new(MemoryStorage::new()))
            .environment(
                Environment::builder()
                    .persistent_storage(true)
                    .analytics_sink(sink)
                    .build(),
            )
            .seed(3)
            .build()
    }

    #[test]
    fn test_binding_loading_until_mounted() {
        let sink = Arc::new(RecordingSink::new());
        let service = service(sink.clone());
        let binding = service.binding("hero-cta");

        assert!(binding.is_loading());
        assert_eq!(binding.variant(), None);
        assert!(!binding.is_treatment());
        assert!(sink.is_empty());
        assert!(service.all_assignments().is_empty());
    }

    #[test]
    fn test_binding_mount_resolves_once() {
        let sink = Arc::new(RecordingSink::new());
        let service = service(sink.clone());
        let mut binding = service.binding("hero-cta");

        let first = binding.mount().map(str::to_string);
        assert!(first.is_some());
        assert!(!binding.is_loading());

        binding.mount();
        binding.mount();

        assert_eq!(binding.variant().map(str::to_string), first);
        // One view for one mount, however many re-renders
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.events()[0].action, "ab_test_view");
    }

    #[test]
    fn test_binding_predicates() {
        let sink = Arc::new(RecordingSink::new());
        let service = service(sink);
        let mut binding = service.binding("hero-cta");
        let variant = binding.mount().unwrap().to_string();

        assert!(binding.is_variant(&variant));
        assert!(!binding.is_variant("variant-z"));
        assert_eq!(binding.is_treatment(), variant != CONTROL);
    }

    #[test]
    fn test_binding_unknown_experiment() {
        let sink = Arc::new(RecordingSink::new());
        let service = service(sink.clone());
        let mut binding = service.binding("missing");

        assert_eq!(binding.mount(), None);
        assert!(!binding.is_loading());
        assert!(sink.is_empty());

        binding.track_conversion("click", None);
        assert!(service.conversion_events().is_empty());
    }

    #[test]
    fn test_conversion_tracker_is_bound() {
        let sink = Arc::new(RecordingSink::new());
        let service = service(sink.clone());
        let mut binding = service.binding("social-proof");
        let variant = binding.mount().unwrap().to_string();

        let track = binding.conversion_tracker();
        track("signup", Some(2.0));

        let events = service.conversion_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].experiment_id(), "social-proof");
        assert_eq!(events[0].variant_id(), variant);
        assert_eq!(
            sink.events()[1].properties.label,
            format!("social-proof:{variant}:signup")
        );
    }
}
