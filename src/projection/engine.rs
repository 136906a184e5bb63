//! Core projection engine: a year-by-year cohort fold

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::brackets::AgeBrackets;
use super::output::ProjectionResult;
use super::population::{PopulationMatrix, PopulationVector};
use super::state::ProjectionState;
use crate::assumptions::{Assumptions, RateTables};
use crate::error::ConfigError;

pub const DEFAULT_START_YEAR: i32 = 1900;
pub const DEFAULT_END_YEAR: i32 = 1967;
pub const DEFAULT_MAX_AGE: usize = 100;
/// Population of Paris in 1901
pub const DEFAULT_INITIAL_POPULATION: f64 = 2_714_068.0;
/// Only the female half of each cohort contributes births
pub const DEFAULT_FEMALE_SHARE: f64 = 0.5;

/// Longest run accepted, in output rows
pub const MAX_PROJECTION_YEARS: i64 = 10_000;
/// Oldest `max_age` accepted
pub const MAX_SUPPORTED_AGE: usize = 1_000;

/// Yearly removal rule applied after births
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullRule {
    /// Zero every age at or above `max_age - step_index + 1`
    #[default]
    PaintedAge,
    /// No cull: the counterfactual baseline
    Disabled,
}

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Initial condition year (not simulated)
    pub start_year: i32,

    /// Last simulated year, inclusive
    pub end_year: i32,

    /// Oldest single age tracked
    pub max_age: usize,

    /// Population of the start year
    pub initial_total_population: f64,

    /// Fraction of each cohort that bears children
    pub female_share: f64,

    pub cull: CullRule,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            max_age: DEFAULT_MAX_AGE,
            initial_total_population: DEFAULT_INITIAL_POPULATION,
            female_share: DEFAULT_FEMALE_SHARE,
            cull: CullRule::PaintedAge,
        }
    }
}

impl ProjectionConfig {
    /// Number of rows in the output, start year included
    pub fn years(&self) -> usize {
        (self.end_year as i64 - self.start_year as i64 + 1).max(0) as usize
    }

    /// Same run without the cull
    pub fn without_cull(&self) -> Self {
        Self {
            cull: CullRule::Disabled,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let span = self.end_year as i64 - self.start_year as i64;
        if !(0..MAX_PROJECTION_YEARS).contains(&span) {
            return Err(ConfigError::InvalidYearSpan {
                start: self.start_year,
                end: self.end_year,
            });
        }
        if self.max_age > MAX_SUPPORTED_AGE {
            return Err(ConfigError::InvalidMaxAge(self.max_age));
        }
        if !self.initial_total_population.is_finite() || self.initial_total_population <= 0.0 {
            return Err(ConfigError::NonPositivePopulation(self.initial_total_population));
        }
        if !(0.0..=1.0).contains(&self.female_share) {
            return Err(ConfigError::InvalidFemaleShare(self.female_share));
        }
        Ok(())
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Run the projection from the configured bracket shares
    ///
    /// Every configuration check happens before the first year is simulated.
    pub fn project(&self) -> Result<ProjectionResult, ConfigError> {
        self.config.validate()?;
        let max_age = self.config.max_age;

        let tables = self.assumptions.rate_tables(max_age)?;
        let brackets = self.assumptions.population.reporting_brackets(max_age)?;
        let initial = self
            .assumptions
            .population
            .build(self.config.initial_total_population, max_age)?;

        Ok(self.run(&tables, &brackets, initial))
    }

    /// Run the projection from an explicit start-year vector
    ///
    /// `initial_total_population` is ignored; the vector is used as given.
    pub fn project_from(&self, initial: PopulationVector) -> Result<ProjectionResult, ConfigError> {
        self.config.validate()?;
        let max_age = self.config.max_age;

        if initial.len() != max_age + 1 {
            return Err(ConfigError::InitialVectorMismatch {
                expected: max_age + 1,
                actual: initial.len(),
            });
        }
        if let Some((age, &value)) = initial
            .as_slice()
            .iter()
            .enumerate()
            .find(|(_, c)| !c.is_finite() || **c < 0.0)
        {
            return Err(ConfigError::NegativePopulation { age, value });
        }

        let tables = self.assumptions.rate_tables(max_age)?;
        let brackets = self.assumptions.population.reporting_brackets(max_age)?;

        Ok(self.run(&tables, &brackets, initial))
    }

    fn run(&self, tables: &RateTables, brackets: &AgeBrackets, initial: PopulationVector) -> ProjectionResult {
        let config = &self.config;
        info!(
            "Projecting {}..={} from {:.0} inhabitants (max age {}, cull {:?})",
            config.start_year,
            config.end_year,
            initial.total(),
            config.max_age,
            config.cull
        );

        let mut matrix = PopulationMatrix::with_capacity(config.start_year, config.max_age, config.years());
        let mut flows = Vec::with_capacity(config.years().saturating_sub(1));
        let mut state = ProjectionState::new(config.start_year, initial);
        let mut extinct = state.population().total() <= 0.0;

        matrix.push(state.population());

        while state.year < config.end_year {
            let step = state.advance_year(tables, config.female_share, config.cull);
            let total = state.population().total();

            debug!(
                "{}: total {:.0}, births {:.0}, deaths {:.0}, exits {:.0}, culled {:.0} (painted age {:?})",
                step.year, total, step.births, step.deaths, step.exits, step.culled, step.painted_age
            );

            if !extinct && total <= 0.0 {
                warn!("No population left in {}", step.year);
                extinct = true;
            }

            matrix.push(state.population());
            flows.push(step);
        }

        let table = brackets.aggregate(&matrix);
        let result = ProjectionResult { matrix, flows, table };

        if let Some((year, total)) = result.totals().last() {
            info!("Projection complete: {:.0} inhabitants in {}", total, year);
        }

        result
    }
}
