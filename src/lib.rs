//! # trueno-ab: Client-Side A/B Experiment Assignment
//!
//! Assigns each browser (or native profile) to one weighted variant per
//! experiment, exactly once, persists the assignment, and attributes
//! conversions to it.
//!
//! ## Components
//!
//! - [`experiment`]: experiment/variant definitions and the registry
//! - [`storage`]: the assignment repository over local-storage-shaped backends
//! - [`assignment`]: assignment/event records and the weighted draw
//! - [`ExperimentService`]: variant resolution, tracking, admin overview
//! - [`binding`]: mount-once binding for UI components
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use trueno_ab::analytics::RecordingSink;
//! use trueno_ab::storage::{MemoryStorage, StorageRepository};
//! use trueno_ab::{Environment, ExperimentService};
//!
//! let sink = Arc::new(RecordingSink::new());
//! let service = ExperimentService::builder(StorageRepository::new(MemoryStorage::new()))
//!     .environment(
//!         Environment::builder()
//!             .persistent_storage(true)
//!             .analytics_sink(sink.clone())
//!             .build(),
//!     )
//!     .build();
//!
//! if let Some(variant) = service.get_variant("hero-cta") {
//!     println!("hero-cta -> {variant}");
//!     service.track_conversion("hero-cta", "hero_cta_click", None);
//! }
//! assert_eq!(sink.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod admin;
pub mod analytics;
pub mod assignment;
pub mod binding;
pub mod config;
pub mod environment;
pub mod error;
pub mod experiment;
pub mod logging;
pub mod service;
pub mod storage;
pub mod tracking;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub mod wasm;

pub use binding::ExperimentBinding;
pub use config::{ExecutionMode, ServiceConfig};
pub use environment::Environment;
pub use error::{Error, Result};
pub use experiment::{Experiment, ExperimentRegistry, Variant};
pub use service::{ExperimentService, ExperimentServiceBuilder};
