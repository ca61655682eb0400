//! Experiment definitions
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentRegistry (1) ──< Experiment (N) ──< Variant (N) [weighted]
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use trueno_ab::experiment::{Experiment, ExperimentRegistry};
//!
//! let registry = ExperimentRegistry::new(vec![
//!     Experiment::builder("checkout-copy", "Checkout Button Copy")
//!         .variant("control", "Buy", 0.5)
//!         .variant("variant-a", "Buy Now", 0.5)
//!         .build(),
//! ])?;
//!
//! assert!(registry.get("checkout-copy").is_some());
//! # Ok::<(), trueno_ab::Error>(())
//! ```

mod experiment_record;
mod registry;
mod variant;

pub use experiment_record::{Experiment, ExperimentBuilder, ExperimentId};
pub use registry::{ExperimentRegistry, DEFAULT_WEIGHT_TOLERANCE};
pub use variant::{Variant, VariantId, CONTROL};
