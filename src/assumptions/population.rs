//! Initial age distribution built from census bracket shares
//!
//! Census data only gives the share of the population in a handful of broad
//! brackets. Every bracket but the oldest is spread evenly over its ages. The
//! oldest bracket is an open-ended tail that thins out with age, so its
//! population is weighted linearly from 1 at its youngest age down to 0 at the
//! maximum age.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::projection::{AgeBracket, AgeBrackets, PopulationVector};

const TABLE: &str = "age brackets";

/// Tolerance on the sum of bracket shares
const SHARE_TOLERANCE: f64 = 1e-6;

/// A named age bracket and its share of the initial population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketShare {
    pub label: String,
    pub min_age: usize,
    pub max_age: usize,
    pub share: f64,
}

impl BracketShare {
    pub fn new(label: impl Into<String>, min_age: usize, max_age: usize, share: f64) -> Self {
        Self {
            label: label.into(),
            min_age,
            max_age,
            share,
        }
    }
}

/// Bracket shares of the starting population, in reporting order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialDistribution {
    pub brackets: Vec<BracketShare>,
}

impl InitialDistribution {
    pub fn new(brackets: Vec<BracketShare>) -> Self {
        Self { brackets }
    }

    /// Paris, 1901 census proportions
    pub fn paris_1901() -> Self {
        Self::new(vec![
            BracketShare::new("0-14", 0, 14, 0.2533),
            BracketShare::new("15-29", 15, 29, 0.2439),
            BracketShare::new("30-44", 30, 44, 0.1991),
            BracketShare::new("45-59", 45, 59, 0.1569),
            BracketShare::new("60-74", 60, 74, 0.1219),
            BracketShare::new("75+", 75, 100, 0.0249),
        ])
    }

    /// Check the brackets partition `[0, max_age]` and the shares sum to 1
    pub fn validate(&self, max_age: usize) -> Result<(), ConfigError> {
        self.reporting_brackets(max_age)?;

        for bracket in &self.brackets {
            if !bracket.share.is_finite() || bracket.share < 0.0 {
                return Err(ConfigError::InvalidRate {
                    table: TABLE,
                    min_age: bracket.min_age,
                    value: bracket.share,
                });
            }
        }

        let sum: f64 = self.brackets.iter().map(|b| b.share).sum();
        if (sum - 1.0).abs() > SHARE_TOLERANCE {
            return Err(ConfigError::SharesDoNotSumToOne { sum });
        }

        Ok(())
    }

    /// The brackets used to aggregate output, in configuration order
    pub fn reporting_brackets(&self, max_age: usize) -> Result<AgeBrackets, ConfigError> {
        let brackets = self
            .brackets
            .iter()
            .map(|b| AgeBracket::new(b.label.clone(), b.min_age, b.max_age))
            .collect();
        AgeBrackets::new(brackets, max_age)
    }

    /// Per-age population for the start year, summing exactly to `total`
    pub fn build(&self, total: f64, max_age: usize) -> Result<PopulationVector, ConfigError> {
        if !total.is_finite() || total <= 0.0 {
            return Err(ConfigError::NonPositivePopulation(total));
        }
        self.validate(max_age)?;

        let mut counts = vec![0.0; max_age + 1];

        for bracket in &self.brackets {
            let bracket_population = total * bracket.share;

            if bracket.max_age == max_age {
                let weights = tail_weights(bracket.min_age, max_age);
                for (age, weight) in (bracket.min_age..=max_age).zip(weights) {
                    counts[age] = bracket_population * weight;
                }
            } else {
                let width = (bracket.max_age - bracket.min_age + 1) as f64;
                let per_age = bracket_population / width;
                for age in bracket.min_age..=bracket.max_age {
                    counts[age] = per_age;
                }
            }
        }

        // Rescale so rounding in the per-age division never drifts from the target
        let computed: f64 = counts.iter().sum();
        if computed <= 0.0 {
            return Err(ConfigError::EmptyInitialDistribution);
        }
        let scale = total / computed;
        for count in &mut counts {
            *count *= scale;
        }

        Ok(PopulationVector::from_counts(counts))
    }
}

/// Linearly decreasing weights from `min_age` (1.0) to `max_age` (0.0), normalized to 1
fn tail_weights(min_age: usize, max_age: usize) -> Vec<f64> {
    let span = max_age - min_age;
    if span == 0 {
        return vec![1.0];
    }

    let raw: Vec<f64> = (min_age..=max_age)
        .map(|age| (max_age - age) as f64 / span as f64)
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PARIS_1901: f64 = 2_714_068.0;

    #[test]
    fn test_initial_total_matches_target() {
        let initial = InitialDistribution::paris_1901().build(PARIS_1901, 100).unwrap();

        assert_eq!(initial.len(), 101);
        assert_relative_eq!(initial.total(), PARIS_1901, max_relative = 1e-9);
        assert!(initial.as_slice().iter().all(|&c| c >= 0.0));
    }

    #[test]
    fn test_uniform_within_young_brackets() {
        let initial = InitialDistribution::paris_1901().build(PARIS_1901, 100).unwrap();

        let per_age = PARIS_1901 * 0.2533 / 15.0;
        assert_relative_eq!(initial.get(0), per_age, max_relative = 1e-9);
        assert_relative_eq!(initial.get(14), per_age, max_relative = 1e-9);

        let per_age = PARIS_1901 * 0.1219 / 15.0;
        assert_relative_eq!(initial.get(60), per_age, max_relative = 1e-9);
    }

    #[test]
    fn test_oldest_bracket_thins_linearly() {
        let initial = InitialDistribution::paris_1901().build(PARIS_1901, 100).unwrap();

        // 26 ages, weights (100 - a) / 25 summing to 13
        let tail = PARIS_1901 * 0.0249;
        assert_relative_eq!(initial.get(75), tail / 13.0, max_relative = 1e-9);
        assert_relative_eq!(initial.get(76), tail * 0.96 / 13.0, max_relative = 1e-9);
        assert_eq!(initial.get(100), 0.0);
        assert!(initial.get(80) > initial.get(90));

        let tail_sum: f64 = (75..=100).map(|a| initial.get(a)).sum();
        assert_relative_eq!(tail_sum, tail, max_relative = 1e-9);
    }

    #[test]
    fn test_tail_weights() {
        assert_eq!(tail_weights(100, 100), vec![1.0]);

        let weights = tail_weights(98, 100);
        assert_relative_eq!(weights[0], 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(weights[1], 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(weights[2], 0.0);
    }

    #[test]
    fn test_everyone_at_birth() {
        let initial = InitialDistribution::new(vec![
            BracketShare::new("newborn", 0, 0, 1.0),
            BracketShare::new("rest", 1, 100, 0.0),
        ])
        .build(1_000_000.0, 100)
        .unwrap();

        assert_eq!(initial.get(0), 1_000_000.0);
        assert_eq!(initial.total(), 1_000_000.0);
    }

    #[test]
    fn test_rejects_bad_shares() {
        let mut dist = InitialDistribution::paris_1901();
        dist.brackets[0].share = 0.3;
        assert!(matches!(
            dist.build(PARIS_1901, 100),
            Err(ConfigError::SharesDoNotSumToOne { .. })
        ));

        let mut dist = InitialDistribution::paris_1901();
        dist.brackets[1].label = "0-14".to_string();
        assert_eq!(
            dist.validate(100),
            Err(ConfigError::DuplicateBracketLabel("0-14".to_string()))
        );
    }

    #[test]
    fn test_rejects_non_positive_total() {
        let dist = InitialDistribution::paris_1901();
        assert_eq!(dist.build(0.0, 100), Err(ConfigError::NonPositivePopulation(0.0)));
        assert!(dist.build(f64::NAN, 100).is_err());
    }

    #[test]
    fn test_single_age_oldest_bracket() {
        let dist = InitialDistribution::new(vec![
            BracketShare::new("young", 0, 99, 0.0),
            BracketShare::new("oldest", 100, 100, 1.0),
        ]);
        assert_eq!(dist.build(10.0, 100).unwrap().get(100), 10.0);
    }
}
