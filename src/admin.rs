//! Admin/debug view of experiments and the current browser's assignments.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::service::ExperimentService;
use crate::storage::AssignmentRepository;

/// One variant row of an [`ExperimentOverview`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantShare {
    /// Variant ID.
    pub id: String,
    /// Variant name.
    pub name: String,
    /// Weight as a rounded percentage.
    pub percentage: i64,
    /// Whether the current browser is assigned to this variant.
    pub current: bool,
}

/// An experiment together with this browser's assignment, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperimentOverview {
    /// Experiment ID.
    pub id: String,
    /// Experiment name.
    pub name: String,
    /// Whether the experiment is live.
    pub enabled: bool,
    /// Target URL pattern, if any.
    pub target_url: Option<String>,
    /// Variants in declaration order.
    pub variants: Vec<VariantShare>,
    /// When the current assignment was made.
    pub assigned_at: Option<DateTime<Utc>>,
}

impl<R: AssignmentRepository> ExperimentService<R> {
    /// Every registered experiment with the current browser's assignment.
    ///
    /// Read-only: unassigned experiments stay unassigned.
    #[must_use]
    pub fn overview(&self) -> Vec<ExperimentOverview> {
        let assignments = self.all_assignments();

        self.registry()
            .experiments()
            .iter()
            .map(|experiment| {
                let assignment = assignments
                    .iter()
                    .find(|a| a.experiment_id() == experiment.id());
                let variants = experiment
                    .variants()
                    .iter()
                    .map(|variant| VariantShare {
                        id: variant.id().to_string(),
                        name: variant.name().to_string(),
                        percentage: variant.percentage(),
                        current: assignment.is_some_and(|a| a.variant_id() == variant.id()),
                    })
                    .collect();

                ExperimentOverview {
                    id: experiment.id().to_string(),
                    name: experiment.name().to_string(),
                    enabled: experiment.enabled(),
                    target_url: experiment.target_url().map(str::to_string),
                    variants,
                    assigned_at: assignment.map(|a| a.assigned_at()),
                }
            })
            .collect()
    }
}
