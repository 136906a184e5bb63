//! Projection engine: the cohort recurrence and its bracket-level output

mod population;
mod state;
mod engine;
mod brackets;
mod output;

pub use population::{PopulationMatrix, PopulationVector};
pub use state::{painted_age, ProjectionState, YearFlows};
pub use engine::{
    CullRule, ProjectionConfig, ProjectionEngine, DEFAULT_END_YEAR, DEFAULT_FEMALE_SHARE,
    DEFAULT_INITIAL_POPULATION, DEFAULT_MAX_AGE, DEFAULT_START_YEAR, MAX_PROJECTION_YEARS,
    MAX_SUPPORTED_AGE,
};
pub use brackets::{AgeBracket, AgeBrackets};
pub use output::{BracketRow, BracketTable, BracketTotal, ProjectionResult, ProjectionSummary, OUTPUT_FILE};
