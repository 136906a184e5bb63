//! CSV-based assumption loader
//!
//! Loads demographic assumptions from CSV files in data/assumptions/:
//! - `mortality_bands.csv`: `min_age,max_age,rate`
//! - `fertility_bands.csv`: `min_age,max_age,share`
//! - `fertility_settings.csv` (optional): `tfr`
//! - `age_brackets.csv`: `label,min_age,max_age,share`

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;

use super::bands::AgeBand;
use super::population::BracketShare;
use crate::error::{CohortError, Result};

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

pub const MORTALITY_FILE: &str = "mortality_bands.csv";
pub const FERTILITY_FILE: &str = "fertility_bands.csv";
pub const FERTILITY_SETTINGS_FILE: &str = "fertility_settings.csv";
pub const BRACKETS_FILE: &str = "age_brackets.csv";

#[derive(Debug, Deserialize)]
struct MortalityRow {
    min_age: usize,
    max_age: usize,
    rate: f64,
}

#[derive(Debug, Deserialize)]
struct FertilityRow {
    min_age: usize,
    max_age: usize,
    share: f64,
}

#[derive(Debug, Deserialize)]
struct FertilitySettingsRow {
    tfr: f64,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new().trim(Trim::All).from_reader(reader)
}

/// Load mortality bands from any reader
pub fn load_mortality_bands_from_reader<R: Read>(reader: R) -> Result<Vec<AgeBand>> {
    let mut reader = csv_reader(reader);
    let mut bands = Vec::new();

    for result in reader.deserialize() {
        let row: MortalityRow = result?;
        bands.push(AgeBand::new(row.min_age, row.max_age, row.rate));
    }

    Ok(bands)
}

/// Load fertility band shares from any reader
pub fn load_fertility_bands_from_reader<R: Read>(reader: R) -> Result<Vec<AgeBand>> {
    let mut reader = csv_reader(reader);
    let mut bands = Vec::new();

    for result in reader.deserialize() {
        let row: FertilityRow = result?;
        bands.push(AgeBand::new(row.min_age, row.max_age, row.share));
    }

    Ok(bands)
}

/// Load the total fertility rate from any reader (first data row)
pub fn load_tfr_from_reader<R: Read>(reader: R) -> Result<f64> {
    let mut reader = csv_reader(reader);

    match reader.deserialize::<FertilitySettingsRow>().next() {
        Some(row) => Ok(row?.tfr),
        None => Err(CohortError::MalformedRow {
            file: FERTILITY_SETTINGS_FILE.to_string(),
            message: "no tfr row".to_string(),
        }),
    }
}

/// Load age brackets and their initial shares from any reader
pub fn load_brackets_from_reader<R: Read>(reader: R) -> Result<Vec<BracketShare>> {
    let mut reader = csv_reader(reader);
    let mut brackets = Vec::new();

    for result in reader.deserialize() {
        let row: BracketShare = result?;
        brackets.push(row);
    }

    Ok(brackets)
}

/// Load mortality bands from `mortality_bands.csv`
pub fn load_mortality_bands(path: &Path) -> Result<Vec<AgeBand>> {
    load_mortality_bands_from_reader(File::open(path.join(MORTALITY_FILE))?)
}

/// Load fertility band shares from `fertility_bands.csv`
pub fn load_fertility_bands(path: &Path) -> Result<Vec<AgeBand>> {
    load_fertility_bands_from_reader(File::open(path.join(FERTILITY_FILE))?)
}

/// Load the TFR from `fertility_settings.csv`, if the file exists
pub fn load_tfr(path: &Path) -> Result<Option<f64>> {
    let file_path = path.join(FERTILITY_SETTINGS_FILE);
    if !file_path.exists() {
        return Ok(None);
    }
    load_tfr_from_reader(File::open(file_path)?).map(Some)
}

/// Load age brackets from `age_brackets.csv`
pub fn load_brackets(path: &Path) -> Result<Vec<BracketShare>> {
    load_brackets_from_reader(File::open(path.join(BRACKETS_FILE))?)
}

/// Raw assumption data as read from disk, before validation
#[derive(Debug, Clone)]
pub struct LoadedAssumptions {
    pub mortality_bands: Vec<AgeBand>,
    pub fertility_bands: Vec<AgeBand>,
    pub tfr: Option<f64>,
    pub brackets: Vec<BracketShare>,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self {
            mortality_bands: load_mortality_bands(path)?,
            fertility_bands: load_fertility_bands(path)?,
            tfr: load_tfr(path)?,
            brackets: load_brackets(path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_mortality_from_reader() {
        let data = "min_age,max_age,rate\n0, 14, 0.05\n15,100,0.01\n";
        let bands = load_mortality_bands_from_reader(data.as_bytes()).unwrap();

        assert_eq!(bands, vec![AgeBand::new(0, 14, 0.05), AgeBand::new(15, 100, 0.01)]);
    }

    #[test]
    fn test_load_brackets_from_reader() {
        let data = "label,min_age,max_age,share\n0-49,0,49,0.7\n50+,50,100,0.3\n";
        let brackets = load_brackets_from_reader(data.as_bytes()).unwrap();

        assert_eq!(brackets.len(), 2);
        assert_eq!(brackets[1], BracketShare::new("50+", 50, 100, 0.3));
    }

    #[test]
    fn test_load_tfr_from_reader() {
        assert_eq!(load_tfr_from_reader("tfr\n2.1\n".as_bytes()).unwrap(), 2.1);
        assert!(matches!(
            load_tfr_from_reader("tfr\n".as_bytes()),
            Err(CohortError::MalformedRow { .. })
        ));
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        let data = "min_age,max_age,share\n15,19,ten percent\n";
        assert!(matches!(
            load_fertility_bands_from_reader(data.as_bytes()),
            Err(CohortError::Csv(_))
        ));
    }

    #[test]
    fn test_load_default_assumptions() {
        let result = LoadedAssumptions::load_default();
        assert!(result.is_ok(), "Failed to load assumptions: {:?}", result.err());

        let assumptions = result.unwrap();
        assert_eq!(assumptions.mortality_bands.len(), 6);
        assert_eq!(assumptions.fertility_bands.len(), 6);
        assert_eq!(assumptions.tfr, Some(2.8));
        assert_eq!(assumptions.brackets.len(), 6);
        assert_eq!(assumptions.brackets[5].label, "75+");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let result = LoadedAssumptions::load_from(Path::new("does/not/exist"));
        assert!(matches!(result, Err(CohortError::Io(_))));
    }
}
