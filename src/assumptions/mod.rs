//! Demographic assumptions: mortality, fertility, and the starting population

mod bands;
mod mortality;
mod fertility;
mod population;
pub mod loader;

pub use bands::{check_ranges, AgeBand, Coverage};
pub use mortality::MortalityTable;
pub use fertility::{FertilitySchedule, FertilityTable};
pub use population::{BracketShare, InitialDistribution};
pub use loader::LoadedAssumptions;

use std::path::Path;

use crate::error::{ConfigError, Result};

/// Container for all projection assumptions, as configured (banded)
#[derive(Debug, Clone, PartialEq)]
pub struct Assumptions {
    /// Annual death probability per age band; must partition all ages
    pub mortality: Vec<AgeBand>,
    pub fertility: FertilitySchedule,
    pub population: InitialDistribution,
}

/// Per-age tables built from the banded assumptions for one max age
#[derive(Debug, Clone, PartialEq)]
pub struct RateTables {
    pub mortality: MortalityTable,
    pub fertility: FertilityTable,
}

impl Assumptions {
    /// Paris, 1901
    pub fn paris_1901() -> Self {
        Self {
            mortality: MortalityTable::paris_1901_bands(),
            fertility: FertilitySchedule::paris_1901(),
            population: InitialDistribution::paris_1901(),
        }
    }

    /// Load assumptions from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedAssumptions::load_from(path)?;
        Ok(Self::from_loaded(loaded))
    }

    /// Assemble from loaded CSV data; a missing TFR falls back to the 1901 value
    pub fn from_loaded(loaded: LoadedAssumptions) -> Self {
        let tfr = loaded.tfr.unwrap_or_else(|| FertilitySchedule::paris_1901().tfr);
        Self {
            mortality: loaded.mortality_bands,
            fertility: FertilitySchedule {
                tfr,
                bands: loaded.fertility_bands,
            },
            population: InitialDistribution::new(loaded.brackets),
        }
    }

    /// Build the per-age mortality and fertility tables
    pub fn rate_tables(&self, max_age: usize) -> std::result::Result<RateTables, ConfigError> {
        Ok(RateTables {
            mortality: MortalityTable::from_bands(&self.mortality, max_age)?,
            fertility: FertilityTable::from_schedule(&self.fertility, max_age)?,
        })
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::paris_1901()
    }
}
