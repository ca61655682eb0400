//! Hero CTA Experiment Example
//!
//! Walks one browser profile through the `hero-cta` experiment: assignment,
//! view tracking through a UI binding, a conversion, the admin overview, and
//! a reset.
//!
//! Run with: cargo run --example hero_cta
//! Optional: TRUENO_AB_MODE=development for the development console,
//!           argument 1 = path of a profile file to persist across runs.

use std::sync::Arc;

use anyhow::Context;
use trueno_ab::analytics::{AnalyticsSink, EventProperties, RecordingSink, TracingSink};
use trueno_ab::storage::{FileStorage, StorageRepository};
use trueno_ab::{logging, Environment, ExecutionMode, ExperimentRegistry, ExperimentService};

/// Forward every event to the log and keep a copy for the summary.
struct Tee {
    recording: Arc<RecordingSink>,
}

impl AnalyticsSink for Tee {
    fn emit(&self, action: &str, properties: &EventProperties) -> trueno_ab::Result<()> {
        TracingSink.emit(action, properties)?;
        self.recording.emit(action, properties)
    }
}

fn main() -> anyhow::Result<()> {
    let mode = ExecutionMode::from_env();
    logging::init(mode);

    println!("=== trueno-ab: Hero CTA Experiment ===\n");

    let profile = std::env::args().nth(1).unwrap_or_else(|| {
        std::env::temp_dir()
            .join("trueno_ab_profile.json")
            .display()
            .to_string()
    });

    let recording = Arc::new(RecordingSink::new());
    let environment = Environment::builder()
        .persistent_storage(true)
        .analytics_sink(Arc::new(Tee {
            recording: Arc::clone(&recording),
        }))
        .mode(mode)
        .build();

    let service = ExperimentService::builder(StorageRepository::new(FileStorage::new(&profile)))
        .registry(ExperimentRegistry::default_catalog())
        .environment(environment)
        .build();

    // -------------------------------------------------------------------------
    // 1. Mount the hero CTA
    // -------------------------------------------------------------------------
    println!("1. Mounting hero CTA (profile: {profile})...");

    let mut cta = service.binding("hero-cta");
    println!("   Loading: {}", cta.is_loading());
    let variant = cta
        .mount()
        .map(str::to_string)
        .context("hero-cta did not resolve a variant")?;

    let label = if cta.is_variant("variant-a") {
        "Try Now - No Credit Card"
    } else {
        "Get Started Free"
    };
    println!("   Variant: {variant}");
    println!("   Button:  [{label}]");

    // -------------------------------------------------------------------------
    // 2. Click
    // -------------------------------------------------------------------------
    println!("\n2. Clicking the CTA...");
    let on_click = cta.conversion_tracker();
    on_click("hero_cta_click", None);
    println!("   Debug log entries: {}", service.conversion_events().len());

    // -------------------------------------------------------------------------
    // 3. Admin overview
    // -------------------------------------------------------------------------
    println!("\n3. Admin overview:");
    for experiment in service.overview() {
        let status = if experiment.enabled { "Active" } else { "Disabled" };
        println!("   {} ({}) [{status}]", experiment.name, experiment.id);
        for variant in &experiment.variants {
            let marker = if variant.current { " (Current)" } else { "" };
            println!("     - {}: {}%{marker}", variant.name, variant.percentage);
        }
        if let Some(at) = experiment.assigned_at {
            println!("     Assigned: {at}");
        }
    }

    // -------------------------------------------------------------------------
    // 4. Analytics summary
    // -------------------------------------------------------------------------
    println!("\n4. Analytics events emitted:");
    for event in recording.events() {
        println!("   {} -> {}", event.action, event.properties.label);
    }

    // -------------------------------------------------------------------------
    // 5. Reset
    // -------------------------------------------------------------------------
    if std::env::var_os("TRUENO_AB_RESET").is_some() {
        println!("\n5. Clearing all assignments...");
        service.clear_all_assignments();
        println!("   Assignments left: {}", service.all_assignments().len());
    }

    println!("\n=== Done ===");
    Ok(())
}
