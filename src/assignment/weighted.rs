//! Weighted variant selection
//!
//! One uniform draw in `[0, 1)` walked against the cumulative variant weights
//! in declaration order. Draws past the total weight fall back to the first
//! variant, so a catalog whose weights sum below 1.0 over-selects it.

use rand::Rng;

use crate::experiment::{Experiment, Variant};

/// Pick the variant for a given draw.
///
/// Returns the first variant whose cumulative weight meets or exceeds `draw`,
/// the first variant when none does, and `None` only when the experiment has
/// no variants.
#[must_use]
pub fn pick_variant(experiment: &Experiment, draw: f64) -> Option<&Variant> {
    let mut cumulative = 0.0;
    for variant in experiment.variants() {
        cumulative += variant.weight();
        if draw <= cumulative {
            return Some(variant);
        }
    }
    experiment.variants().first()
}

/// Draw a variant using `rng`.
pub fn assign_variant<'a, R: Rng>(
    experiment: &'a Experiment,
    rng: &mut R,
) -> Option<&'a Variant> {
    let draw: f64 = rng.gen();
    pick_variant(experiment, draw)
}
