//! End-to-end assignment and tracking behaviour over the public API.

use std::sync::Arc;

use trueno_ab::analytics::RecordingSink;
use trueno_ab::config::StorageConfig;
use trueno_ab::storage::{
    AssignmentRepository, FileStorage, MemoryStorage, StorageBackend, StorageRepository,
};
use trueno_ab::{Environment, Experiment, ExperimentRegistry, ExperimentService};

type MemoryService = ExperimentService<StorageRepository<MemoryStorage>>;

fn browser(seed: u64) -> MemoryService {
    ExperimentService::builder(StorageRepository::new(MemoryStorage::new()))
        .environment(Environment::builder().persistent_storage(true).build())
        .seed(seed)
        .build()
}

fn share(counts: usize, total: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let ratio = counts as f64 / total as f64;
    ratio
}

// =============================================================================
// Assignment
// =============================================================================

#[test]
fn test_hero_cta_fresh_browser_gets_valid_stable_variant() {
    let service = browser(1);

    let variant = service.get_variant("hero-cta").expect("enabled experiment");
    assert!(variant == "control" || variant == "variant-a");

    for _ in 0..20 {
        assert_eq!(service.get_variant("hero-cta").as_deref(), Some(variant.as_str()));
    }
}

#[test]
fn test_unknown_and_disabled_experiments_resolve_to_none() {
    let registry = ExperimentRegistry::new(vec![
        Experiment::builder("live", "Live")
            .variant("control", "C", 1.0)
            .build(),
        Experiment::builder("paused", "Paused")
            .enabled(false)
            .variant("control", "C", 1.0)
            .build(),
    ])
    .unwrap();
    let service = ExperimentService::builder(StorageRepository::new(MemoryStorage::new()))
        .registry(registry)
        .environment(Environment::builder().persistent_storage(true).build())
        .build();

    for _ in 0..10 {
        assert_eq!(service.get_variant("paused"), None);
        assert_eq!(service.get_variant("never-registered"), None);
    }
    assert_eq!(service.get_variant("live").as_deref(), Some("control"));
    assert_eq!(service.all_assignments().len(), 1);
}

#[test]
fn test_clear_then_get_variant_redraws_with_new_timestamp() {
    let service = browser(9);
    service.get_variant("hero-cta").unwrap();
    let before = service.all_assignments()[0].assigned_at();

    std::thread::sleep(std::time::Duration::from_millis(5));
    service.clear_all_assignments();
    assert!(service.all_assignments().is_empty());

    let variant = service.get_variant("hero-cta").unwrap();
    let assignments = service.all_assignments();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].variant_id(), variant);
    assert!(assignments[0].assigned_at() > before);
}

#[test]
fn test_redraws_after_clear_can_change_variant() {
    let service = browser(11);
    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..64 {
        service.clear_all_assignments();
        seen.insert(service.get_variant("hero-cta").unwrap());
    }
    assert_eq!(seen.len(), 2);
}

#[test]
fn test_distribution_matches_weights() {
    const SAMPLES: usize = 10_000;
    let service = browser(2024);

    let mut hero = [0usize; 2];
    let mut social = [0usize; 3];
    for _ in 0..SAMPLES {
        service.clear_all_assignments();
        match service.get_variant("hero-cta").unwrap().as_str() {
            "control" => hero[0] += 1,
            "variant-a" => hero[1] += 1,
            other => panic!("unexpected variant {other}"),
        }
        match service.get_variant("social-proof").unwrap().as_str() {
            "control" => social[0] += 1,
            "variant-a" => social[1] += 1,
            "variant-b" => social[2] += 1,
            other => panic!("unexpected variant {other}"),
        }
    }

    for count in hero {
        assert!((share(count, SAMPLES) - 0.5).abs() < 0.03, "hero share {count}");
    }
    for (count, weight) in social.into_iter().zip([0.33, 0.33, 0.34]) {
        assert!((share(count, SAMPLES) - weight).abs() < 0.03, "social share {count}");
    }
}

#[test]
fn test_short_weights_skew_toward_first_variant() {
    const SAMPLES: usize = 5_000;
    let registry = ExperimentRegistry::new(vec![Experiment::builder("short", "Short")
        .variant("control", "C", 0.25)
        .variant("variant-a", "A", 0.25)
        .build()])
    .unwrap();
    let service = ExperimentService::builder(StorageRepository::new(MemoryStorage::new()))
        .registry(registry)
        .environment(Environment::builder().persistent_storage(true).build())
        .seed(5)
        .build();

    let mut control = 0;
    for _ in 0..SAMPLES {
        service.clear_all_assignments();
        if service.get_variant("short").as_deref() == Some("control") {
            control += 1;
        }
    }
    // 0.25 direct + 0.5 fallback
    assert!((share(control, SAMPLES) - 0.75).abs() < 0.03);
}

#[test]
fn test_headless_environment_never_assigns() {
    let sink = Arc::new(RecordingSink::new());
    let service = ExperimentService::builder(StorageRepository::new(MemoryStorage::new()))
        .environment(Environment::builder().analytics_sink(sink.clone()).build())
        .build();

    assert_eq!(service.get_variant("hero-cta"), None);
    service.track_conversion("hero-cta", "hero_cta_click", None);
    service.track_experiment_view("hero-cta");

    assert!(sink.is_empty());
    assert!(service.repository().backend().is_empty());
}

// =============================================================================
// Tracking
// =============================================================================

#[test]
fn test_conversion_on_assigned_browser_appends_one_event() {
    let repository = StorageRepository::new(MemoryStorage::new());
    repository.save_assignment("hero-cta", "variant-a");
    let service = ExperimentService::builder(repository)
        .environment(Environment::builder().persistent_storage(true).build())
        .build();

    service.track_conversion("hero-cta", "hero_cta_click", None);

    let events = service.conversion_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].experiment_id(), "hero-cta");
    assert_eq!(events[0].variant_id(), "variant-a");
    assert_eq!(events[0].event_name(), "hero_cta_click");
}

#[test]
fn test_conversion_without_variant_writes_nothing() {
    let sink = Arc::new(RecordingSink::new());
    let service = ExperimentService::builder(StorageRepository::new(MemoryStorage::new()))
        .environment(
            Environment::builder()
                .persistent_storage(true)
                .analytics_sink(sink.clone())
                .build(),
        )
        .build();

    service.track_conversion("unknown-experiment", "click", Some(3.0));

    assert!(sink.is_empty());
    assert!(service.repository().backend().is_empty());
}

#[test]
fn test_conversion_assigns_on_first_exposure() {
    let service = browser(4);
    service.track_conversion("social-proof", "signup", None);

    let assignment = service.repository().find_assignment("social-proof").unwrap();
    assert_eq!(service.conversion_events()[0].variant_id(), assignment.variant_id());
}

#[test]
fn test_event_log_keeps_last_hundred() {
    let service = browser(8);
    for i in 0..130 {
        service.track_conversion("hero-cta", &format!("click-{i}"), None);
    }

    let events = service.conversion_events();
    assert_eq!(events.len(), 100);
    assert_eq!(events[0].event_name(), "click-30");
    assert_eq!(events[99].event_name(), "click-129");
}

#[test]
fn test_clear_removes_event_log() {
    let service = browser(8);
    service.track_conversion("hero-cta", "click", None);
    service.clear_all_assignments();
    assert!(service.conversion_events().is_empty());
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_assignment_survives_restart_with_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.json");
    let env = || Environment::builder().persistent_storage(true).build();

    let first = ExperimentService::builder(StorageRepository::new(FileStorage::new(&path)))
        .environment(env())
        .build()
        .get_variant("pricing-display")
        .unwrap();

    for seed in 0..5 {
        let restarted = ExperimentService::builder(StorageRepository::new(FileStorage::new(&path)))
            .environment(env())
            .seed(seed)
            .build();
        assert_eq!(restarted.get_variant("pricing-display"), Some(first.clone()));
    }
}

#[test]
fn test_previously_persisted_layout_is_honoured() {
    let storage = MemoryStorage::new();
    storage
        .set_item(
            "ab_tests",
            r#"[{"experimentId":"social-proof","variantId":"variant-b","assignedAt":"2025-03-01T12:00:00.000Z"}]"#,
        )
        .unwrap();
    let service = ExperimentService::builder(StorageRepository::new(storage))
        .environment(Environment::builder().persistent_storage(true).build())
        .build();

    assert!(service.is_variant("social-proof", "variant-b"));
}

#[test]
fn test_existing_client_keys_are_read_when_configured() {
    let storage = MemoryStorage::new();
    storage
        .set_item(
            "site_ab_tests",
            r#"[{"experimentId":"hero-cta","variantId":"variant-a","assignedAt":"2025-03-01T12:00:00.000Z"}]"#,
        )
        .unwrap();
    let config = StorageConfig {
        assignments_key: "site_ab_tests".into(),
        events_key: "site_ab_events".into(),
        ..StorageConfig::default()
    };
    let service = ExperimentService::builder(StorageRepository::with_config(storage, config))
        .environment(Environment::builder().persistent_storage(true).build())
        .build();

    assert!(service.is_variant("hero-cta", "variant-a"));
    service.track_conversion("hero-cta", "click", None);
    assert!(service
        .repository()
        .backend()
        .contains_key("site_ab_events")
        .unwrap());
    assert!(!service.repository().backend().contains_key("ab_tests").unwrap());
}

#[test]
fn test_corrupt_storage_behaves_as_unassigned() {
    let storage = MemoryStorage::new();
    storage.set_item("ab_tests", "][").unwrap();
    let service = ExperimentService::builder(StorageRepository::new(storage))
        .environment(Environment::builder().persistent_storage(true).build())
        .seed(1)
        .build();

    let variant = service.get_variant("hero-cta").unwrap();
    assert_eq!(service.get_variant("hero-cta"), Some(variant));
    assert_eq!(service.all_assignments().len(), 1);
}

#[test]
fn test_corrupt_profile_file_recovers_and_stays_stable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.json");
    std::fs::write(&path, "{not json").unwrap();

    let service = ExperimentService::builder(StorageRepository::new(FileStorage::new(&path)))
        .environment(Environment::builder().persistent_storage(true).build())
        .seed(3)
        .build();

    let variant = service.get_variant("hero-cta").unwrap();
    for _ in 0..32 {
        assert_eq!(service.get_variant("hero-cta").as_deref(), Some(variant.as_str()));
    }
    assert_eq!(service.all_assignments().len(), 1);

    let restarted = ExperimentService::builder(StorageRepository::new(FileStorage::new(&path)))
        .environment(Environment::builder().persistent_storage(true).build())
        .seed(99)
        .build();
    assert_eq!(restarted.get_variant("hero-cta"), Some(variant));
}
