//! Piecewise-constant age bands
//!
//! Rate assumptions are expressed as a handful of contiguous age bands, each
//! carrying one value. The tables used by the projection are per single year
//! of age, so every band is broadcast across the ages it covers.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::ConfigError;

/// A contiguous age range `min_age..=max_age` carrying one value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeBand {
    pub min_age: usize,
    pub max_age: usize,
    pub value: f64,
}

impl AgeBand {
    pub fn new(min_age: usize, max_age: usize, value: f64) -> Self {
        Self { min_age, max_age, value }
    }

    /// Number of single ages in the band
    pub fn width(&self) -> usize {
        (self.max_age + 1).saturating_sub(self.min_age)
    }

    pub fn ages(&self) -> RangeInclusive<usize> {
        self.min_age..=self.max_age
    }

    pub fn contains(&self, age: usize) -> bool {
        self.ages().contains(&age)
    }
}

/// How a set of ranges must relate to `[0, max_age]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Every age covered exactly once
    Partition,
    /// No age covered twice; gaps allowed
    Disjoint,
}

/// Validate a set of inclusive age ranges against `[0, max_age]`
pub fn check_ranges<I>(
    table: &'static str,
    ranges: I,
    max_age: usize,
    coverage: Coverage,
) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let mut covered = vec![false; max_age + 1];
    let mut any = false;

    for (min_age, band_max) in ranges {
        any = true;
        if min_age > band_max {
            return Err(ConfigError::MalformedRange { table, min_age, max_age: band_max });
        }
        if band_max > max_age {
            return Err(ConfigError::AgeOutOfRange { table, age: band_max, max_age });
        }
        for age in min_age..=band_max {
            if covered[age] {
                return Err(ConfigError::Overlap { table, age });
            }
            covered[age] = true;
        }
    }

    if !any {
        return Err(ConfigError::EmptyBands { table });
    }

    if coverage == Coverage::Partition {
        if let Some(age) = covered.iter().position(|&c| !c) {
            return Err(ConfigError::Gap { table, age });
        }
    }

    Ok(())
}

/// Spread per-band values onto single ages; uncovered ages stay at 0
pub(crate) fn broadcast<F>(bands: &[AgeBand], max_age: usize, per_age: F) -> Vec<f64>
where
    F: Fn(&AgeBand) -> f64,
{
    let mut rates = vec![0.0; max_age + 1];
    for band in bands {
        let value = per_age(band);
        for age in band.ages() {
            rates[age] = value;
        }
    }
    rates
}
