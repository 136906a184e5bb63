//! Cohort Projection - year-by-year population projection by single year of age
//!
//! This library provides:
//! - Banded mortality and fertility assumptions expanded to per-age tables
//! - Initial age distributions built from census bracket shares
//! - A deterministic cohort recurrence with a descending painted-age cull
//! - Bracket-level aggregation and CSV output for plotting
//! - Batch and counterfactual scenario runs

pub mod error;
pub mod assumptions;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{CohortError, ConfigError, Result};
pub use assumptions::{Assumptions, AgeBand, FertilitySchedule, InitialDistribution, BracketShare};
pub use projection::{ProjectionEngine, ProjectionConfig, ProjectionResult, CullRule, BracketTable};
pub use scenario::{ScenarioRunner, ScenarioComparison};
