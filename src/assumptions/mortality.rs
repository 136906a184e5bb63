//! Age-specific annual mortality
//!
//! Mortality is configured as constant death probabilities over contiguous age
//! bands. The bands must partition `[0, max_age]`: an uncovered age would
//! silently become immortal, so gaps are rejected rather than defaulted.

use super::bands::{broadcast, check_ranges, AgeBand, Coverage};
use crate::error::ConfigError;

const TABLE: &str = "mortality";

/// Annual probability of death by single year of age
#[derive(Debug, Clone, PartialEq)]
pub struct MortalityTable {
    /// Annual death probability (index = age)
    rates: Vec<f64>,
}

impl MortalityTable {
    /// Build the per-age table from banded rates
    pub fn from_bands(bands: &[AgeBand], max_age: usize) -> Result<Self, ConfigError> {
        check_ranges(TABLE, bands.iter().map(|b| (b.min_age, b.max_age)), max_age, Coverage::Partition)?;

        for band in bands {
            if !(0.0..=1.0).contains(&band.value) {
                return Err(ConfigError::InvalidRate {
                    table: TABLE,
                    min_age: band.min_age,
                    value: band.value,
                });
            }
        }

        Ok(Self {
            rates: broadcast(bands, max_age, |b| b.value),
        })
    }

    /// Same death probability at every age
    pub fn flat(rate: f64, max_age: usize) -> Result<Self, ConfigError> {
        Self::from_bands(&[AgeBand::new(0, max_age, rate)], max_age)
    }

    /// Paris, 1901: rough annual death probabilities by broad age group
    pub fn paris_1901_bands() -> Vec<AgeBand> {
        vec![
            AgeBand::new(0, 14, 0.05),
            AgeBand::new(15, 29, 0.01),
            AgeBand::new(30, 44, 0.02),
            AgeBand::new(45, 59, 0.04),
            AgeBand::new(60, 74, 0.10),
            AgeBand::new(75, 100, 0.20),
        ]
    }

    /// Annual death probability at `age`
    pub fn annual_rate(&self, age: usize) -> f64 {
        self.rates.get(age).copied().unwrap_or(1.0)
    }

    /// Probability of surviving the year at `age`
    pub fn survival_rate(&self, age: usize) -> f64 {
        1.0 - self.annual_rate(age)
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn max_age(&self) -> usize {
        self.rates.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paris_bands_broadcast() {
        let table = MortalityTable::from_bands(&MortalityTable::paris_1901_bands(), 100).unwrap();

        assert_eq!(table.rates().len(), 101);
        assert_eq!(table.annual_rate(0), 0.05);
        assert_eq!(table.annual_rate(14), 0.05);
        assert_eq!(table.annual_rate(15), 0.01);
        assert_eq!(table.annual_rate(59), 0.04);
        assert_eq!(table.annual_rate(74), 0.10);
        assert_eq!(table.annual_rate(100), 0.20);
        assert!((table.survival_rate(80) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_beyond_table_is_certain_death() {
        let table = MortalityTable::flat(0.0, 10).unwrap();
        assert_eq!(table.annual_rate(11), 1.0);
        assert_eq!(table.max_age(), 10);
    }

    #[test]
    fn test_rejects_rate_outside_unit_interval() {
        let bands = [AgeBand::new(0, 50, 0.01), AgeBand::new(51, 100, 1.5)];
        assert_eq!(
            MortalityTable::from_bands(&bands, 100),
            Err(ConfigError::InvalidRate { table: "mortality", min_age: 51, value: 1.5 })
        );

        let negative = [AgeBand::new(0, 100, -0.01)];
        assert!(MortalityTable::from_bands(&negative, 100).is_err());

        let nan = [AgeBand::new(0, 100, f64::NAN)];
        assert!(MortalityTable::from_bands(&nan, 100).is_err());
    }

    #[test]
    fn test_rejects_uncovered_ages() {
        let bands = [AgeBand::new(0, 74, 0.01)];
        assert_eq!(
            MortalityTable::from_bands(&bands, 100),
            Err(ConfigError::Gap { table: "mortality", age: 75 })
        );
    }
}
