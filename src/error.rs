//! Error types for the cohort projection engine

use thiserror::Error;

/// A configuration that violates a precondition of the model.
///
/// Every variant is detected before the first simulated year runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{table}: no bands defined")]
    EmptyBands { table: &'static str },

    #[error("{table}: malformed age range {min_age}..={max_age}")]
    MalformedRange {
        table: &'static str,
        min_age: usize,
        max_age: usize,
    },

    #[error("{table}: age {age} lies beyond max age {max_age}")]
    AgeOutOfRange {
        table: &'static str,
        age: usize,
        max_age: usize,
    },

    #[error("{table}: age {age} is not covered by any band")]
    Gap { table: &'static str, age: usize },

    #[error("{table}: age {age} is covered by more than one band")]
    Overlap { table: &'static str, age: usize },

    #[error("{table}: invalid value {value} for band starting at age {min_age}")]
    InvalidRate {
        table: &'static str,
        min_age: usize,
        value: f64,
    },

    #[error("bracket shares sum to {sum}, expected 1.0")]
    SharesDoNotSumToOne { sum: f64 },

    #[error("fertility band shares sum to {sum}, expected 1.0")]
    FertilitySharesDoNotSumToOne { sum: f64 },

    #[error("duplicate bracket label: {0}")]
    DuplicateBracketLabel(String),

    #[error("invalid year span {start}..={end}")]
    InvalidYearSpan { start: i32, end: i32 },

    #[error("max age {0} exceeds the supported limit")]
    InvalidMaxAge(usize),

    #[error("initial population must be positive, got {0}")]
    NonPositivePopulation(f64),

    #[error("female share must lie in [0, 1], got {0}")]
    InvalidFemaleShare(f64),

    #[error("total fertility rate must be non-negative and finite, got {0}")]
    InvalidTfr(f64),

    #[error("initial distribution places no population at any age")]
    EmptyInitialDistribution,

    #[error("initial vector has {actual} age slots, expected {expected}")]
    InitialVectorMismatch { expected: usize, actual: usize },

    #[error("invalid population {value} at age {age}")]
    NegativePopulation { age: usize, value: f64 },
}

/// Errors surfaced by the library
#[derive(Error, Debug)]
pub enum CohortError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed assumption row in {file}: {message}")]
    MalformedRow { file: String, message: String },
}

/// Result type alias for the cohort projection engine
pub type Result<T> = std::result::Result<T, CohortError>;
