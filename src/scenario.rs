//! Scenario runner for batch projections
//!
//! Pre-loads assumptions once, then runs many projections with different
//! configurations without re-reading CSV files. Each run is an independent
//! sequential fold, so separate scenarios can run in parallel.

use rayon::prelude::*;
use serde::Serialize;

use crate::assumptions::Assumptions;
use crate::error::{ConfigError, Result};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Pre-loaded scenario runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// let configs: Vec<_> = [1950, 1967, 2000]
///     .iter()
///     .map(|&end_year| ProjectionConfig { end_year, ..Default::default() })
///     .collect();
/// let results = runner.run_scenarios(&configs);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Pre-loaded base assumptions
    base_assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Create runner with the built-in 1901 assumptions
    pub fn new() -> Self {
        Self {
            base_assumptions: Assumptions::paris_1901(),
        }
    }

    /// Create runner by loading assumptions from CSV files
    pub fn from_csv() -> Result<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv()?,
        })
    }

    /// Create runner from specific assumptions directory
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv_path(path)?,
        })
    }

    /// Create runner with pre-built assumptions
    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Run a single projection with the given config
    pub fn run(&self, config: ProjectionConfig) -> std::result::Result<ProjectionResult, ConfigError> {
        ProjectionEngine::new(self.base_assumptions.clone(), config).project()
    }

    /// Run several configurations in parallel, results in input order
    pub fn run_scenarios(
        &self,
        configs: &[ProjectionConfig],
    ) -> Vec<std::result::Result<ProjectionResult, ConfigError>> {
        configs
            .par_iter()
            .map(|config| self.run(config.clone()))
            .collect()
    }

    /// Run `config` alongside the same configuration with no cull
    pub fn compare(&self, config: ProjectionConfig) -> std::result::Result<ScenarioComparison, ConfigError> {
        let baseline = config.without_cull();
        let (culled, counterfactual) = rayon::join(|| self.run(config), || self.run(baseline));

        Ok(ScenarioComparison {
            culled: culled?,
            counterfactual: counterfactual?,
        })
    }

    /// Get reference to base assumptions for inspection/modification
    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    /// Get mutable reference to base assumptions for customization
    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.base_assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// A culled run and its no-cull counterfactual
#[derive(Debug, Clone)]
pub struct ScenarioComparison {
    pub culled: ProjectionResult,
    pub counterfactual: ProjectionResult,
}

/// Population missing from the culled run in one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearShortfall {
    pub year: i32,
    pub culled_total: f64,
    pub counterfactual_total: f64,
    pub shortfall: f64,
}

impl ScenarioComparison {
    /// Per-year difference between the counterfactual and the culled run
    pub fn shortfall_by_year(&self) -> Vec<YearShortfall> {
        self.culled
            .totals()
            .into_iter()
            .zip(self.counterfactual.totals())
            .map(|((year, culled_total), (_, counterfactual_total))| YearShortfall {
                year,
                culled_total,
                counterfactual_total,
                shortfall: counterfactual_total - culled_total,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::CullRule;

    #[test]
    fn test_scenario_runner_batch() {
        let runner = ScenarioRunner::new();

        let configs: Vec<_> = [0.3, 0.5, 0.7]
            .iter()
            .map(|&female_share| ProjectionConfig {
                female_share,
                cull: CullRule::Disabled,
                ..ProjectionConfig::default()
            })
            .collect();

        let results = runner.run_scenarios(&configs);
        assert_eq!(results.len(), 3);

        let finals: Vec<f64> = results
            .iter()
            .map(|r| r.as_ref().unwrap().summary().final_total)
            .collect();

        // More mothers, more people
        assert!(finals[2] > finals[1]);
        assert!(finals[1] > finals[0]);
    }

    #[test]
    fn test_batch_keeps_errors_per_scenario() {
        let runner = ScenarioRunner::new();
        let configs = [
            ProjectionConfig::default(),
            ProjectionConfig { female_share: -0.1, ..ProjectionConfig::default() },
        ];

        let results = runner.run_scenarios(&configs);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err(), &ConfigError::InvalidFemaleShare(-0.1));
    }

    #[test]
    fn test_compare_with_counterfactual() {
        let runner = ScenarioRunner::new();
        let comparison = runner.compare(ProjectionConfig::default()).unwrap();
        let shortfall = comparison.shortfall_by_year();

        assert_eq!(shortfall.len(), 68);
        // Identical start; the first cull only removes the top age
        assert_eq!(shortfall[0].shortfall, 0.0);
        assert!(shortfall.iter().all(|s| s.shortfall >= -1e-6));
        assert!(shortfall.last().unwrap().shortfall > 0.0);
    }

    #[test]
    fn test_runner_from_csv() {
        let runner = ScenarioRunner::from_csv().unwrap();
        assert_eq!(runner.assumptions(), &Assumptions::paris_1901());
    }
}
