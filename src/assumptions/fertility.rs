//! Age-specific fertility
//!
//! Fertility is configured as a total fertility rate (TFR) plus the fraction of
//! it realised in each reproductive age band. Within a band the births are
//! spread evenly: `rate(age) = share * tfr / band_width`.
//!
//! The per-age rate is births per individual regardless of sex. Restricting it
//! to the female contribution happens in the stepper (see
//! `ProjectionConfig::female_share`).

use serde::{Deserialize, Serialize};

use super::bands::{broadcast, check_ranges, AgeBand, Coverage};
use crate::error::ConfigError;

const TABLE: &str = "fertility";

/// Tolerance used when checking that band shares add up to the whole TFR
const SHARE_TOLERANCE: f64 = 1e-6;

/// Total fertility rate and its split across reproductive age bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilitySchedule {
    /// Expected children per individual over a full reproductive life
    pub tfr: f64,
    /// Fraction of the TFR realised in each band (`value` = share)
    pub bands: Vec<AgeBand>,
}

impl FertilitySchedule {
    /// Paris, 1901: TFR 2.8 spread over five-year bands from 15 to 44
    pub fn paris_1901() -> Self {
        Self {
            tfr: 2.8,
            bands: vec![
                AgeBand::new(15, 19, 0.10),
                AgeBand::new(20, 24, 0.25),
                AgeBand::new(25, 29, 0.30),
                AgeBand::new(30, 34, 0.20),
                AgeBand::new(35, 39, 0.10),
                AgeBand::new(40, 44, 0.05),
            ],
        }
    }

    /// Sum of all band shares
    pub fn share_total(&self) -> f64 {
        self.bands.iter().map(|b| b.value).sum()
    }
}

/// Expected births per individual by single year of age
#[derive(Debug, Clone, PartialEq)]
pub struct FertilityTable {
    rates: Vec<f64>,
}

impl FertilityTable {
    /// Build the per-age table from a schedule
    pub fn from_schedule(schedule: &FertilitySchedule, max_age: usize) -> Result<Self, ConfigError> {
        if !schedule.tfr.is_finite() || schedule.tfr < 0.0 {
            return Err(ConfigError::InvalidTfr(schedule.tfr));
        }

        check_ranges(
            TABLE,
            schedule.bands.iter().map(|b| (b.min_age, b.max_age)),
            max_age,
            Coverage::Disjoint,
        )?;

        for band in &schedule.bands {
            if !band.value.is_finite() || band.value < 0.0 {
                return Err(ConfigError::InvalidRate {
                    table: TABLE,
                    min_age: band.min_age,
                    value: band.value,
                });
            }
        }

        let share_total = schedule.share_total();
        if (share_total - 1.0).abs() > SHARE_TOLERANCE {
            return Err(ConfigError::FertilitySharesDoNotSumToOne { sum: share_total });
        }

        let tfr = schedule.tfr;
        Ok(Self {
            rates: broadcast(&schedule.bands, max_age, |b| b.value * tfr / b.width() as f64),
        })
    }

    /// No births at any age
    pub fn zero(max_age: usize) -> Self {
        Self {
            rates: vec![0.0; max_age + 1],
        }
    }

    pub fn rate(&self, age: usize) -> f64 {
        self.rates.get(age).copied().unwrap_or(0.0)
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Realised TFR: sum of the per-age rates
    pub fn total_fertility(&self) -> f64 {
        self.rates.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_paris_rates_per_age() {
        let table = FertilityTable::from_schedule(&FertilitySchedule::paris_1901(), 100).unwrap();

        // 10% of 2.8 over 5 years
        assert_relative_eq!(table.rate(15), 0.056, epsilon = 1e-12);
        assert_relative_eq!(table.rate(22), 0.14, epsilon = 1e-12);
        assert_relative_eq!(table.rate(27), 0.168, epsilon = 1e-12);
        assert_relative_eq!(table.rate(30), 0.112, epsilon = 1e-12);
        assert_relative_eq!(table.rate(39), 0.056, epsilon = 1e-12);
        assert_relative_eq!(table.rate(44), 0.028, epsilon = 1e-12);
        assert_eq!(table.rate(14), 0.0);
        assert_eq!(table.rate(45), 0.0);
        assert_eq!(table.rate(0), 0.0);
    }

    #[test]
    fn test_realised_tfr_matches_target() {
        let table = FertilityTable::from_schedule(&FertilitySchedule::paris_1901(), 100).unwrap();
        assert_relative_eq!(table.total_fertility(), 2.8, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_invalid_tfr_and_shares() {
        let mut schedule = FertilitySchedule::paris_1901();
        schedule.tfr = -1.0;
        assert_eq!(
            FertilityTable::from_schedule(&schedule, 100),
            Err(ConfigError::InvalidTfr(-1.0))
        );

        let mut schedule = FertilitySchedule::paris_1901();
        schedule.bands[2].value = -0.3;
        assert!(matches!(
            FertilityTable::from_schedule(&schedule, 100),
            Err(ConfigError::InvalidRate { min_age: 25, .. })
        ));
    }

    #[test]
    fn test_rejects_shares_not_summing_to_one() {
        let schedule = FertilitySchedule {
            tfr: 2.8,
            bands: vec![AgeBand::new(15, 44, 0.5)],
        };
        assert_eq!(
            FertilityTable::from_schedule(&schedule, 100),
            Err(ConfigError::FertilitySharesDoNotSumToOne { sum: 0.5 })
        );

        let mut schedule = FertilitySchedule::paris_1901();
        schedule.bands[0].value = 0.0;
        assert!(matches!(
            FertilityTable::from_schedule(&schedule, 100),
            Err(ConfigError::FertilitySharesDoNotSumToOne { .. })
        ));
    }

    #[test]
    fn test_rejects_overlapping_bands() {
        let schedule = FertilitySchedule {
            tfr: 2.0,
            bands: vec![AgeBand::new(15, 30, 0.5), AgeBand::new(30, 44, 0.5)],
        };
        assert_eq!(
            FertilityTable::from_schedule(&schedule, 100),
            Err(ConfigError::Overlap { table: "fertility", age: 30 })
        );
    }

    #[test]
    fn test_zero_table() {
        let table = FertilityTable::zero(100);
        assert_eq!(table.rates().len(), 101);
        assert_eq!(table.total_fertility(), 0.0);
    }
}
