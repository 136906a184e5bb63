//! Output structures for projections
//!
//! The bracket table is written as `population.csv`: a `year` column followed
//! by one column per bracket label, one row per year. The plotting side keys on
//! the year column, so it must stay unique and increase by one per row.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::population::PopulationMatrix;
use super::state::YearFlows;
use crate::error::Result;

/// File name of the bracket table inside an output directory
pub const OUTPUT_FILE: &str = "population.csv";

/// Population per bracket for one year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketRow {
    pub year: i32,
    pub populations: Vec<f64>,
}

impl BracketRow {
    pub fn total(&self) -> f64 {
        self.populations.iter().sum()
    }
}

/// Bracket populations for every projected year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketTable {
    labels: Vec<String>,
    rows: Vec<BracketRow>,
}

impl BracketTable {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            rows: Vec::new(),
        }
    }

    /// Add a row
    pub fn push(&mut self, row: BracketRow) {
        debug_assert_eq!(row.populations.len(), self.labels.len());
        self.rows.push(row);
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[BracketRow] {
        &self.rows
    }

    pub fn row(&self, year: i32) -> Option<&BracketRow> {
        self.rows.iter().find(|r| r.year == year)
    }

    /// All years of one bracket's population
    pub fn column(&self, label: &str) -> Option<Vec<f64>> {
        let idx = self.labels.iter().position(|l| l == label)?;
        Some(self.rows.iter().map(|r| r.populations[idx]).collect())
    }

    /// Write the table as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        let mut header = Vec::with_capacity(self.labels.len() + 1);
        header.push("year");
        header.extend(self.labels.iter().map(String::as_str));
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = Vec::with_capacity(row.populations.len() + 1);
            record.push(row.year.to_string());
            record.extend(row.populations.iter().map(|p| p.to_string()));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Write `population.csv` into `output_dir`, creating the directory if needed
    pub fn write_to_dir(&self, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir)?;
        let file = File::create(output_dir.join(OUTPUT_FILE))?;
        self.write_csv(file)
    }
}

/// Complete projection result
#[derive(Debug, Clone)]
pub struct ProjectionResult {
    /// Per-age population for every year, start year included
    pub matrix: PopulationMatrix,

    /// Flows of each simulated year (start year excluded)
    pub flows: Vec<YearFlows>,

    /// Bracket populations for every year
    pub table: BracketTable,
}

impl ProjectionResult {
    /// Total population per year, in year order
    pub fn totals(&self) -> Vec<(i32, f64)> {
        self.table.rows().iter().map(|r| (r.year, r.total())).collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let totals = self.totals();

        let (start_year, initial_total) = totals.first().copied().unwrap_or((0, 0.0));
        let (end_year, final_total) = totals.last().copied().unwrap_or((start_year, 0.0));
        let (peak_year, peak_total) = totals
            .iter()
            .copied()
            .fold((start_year, f64::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });

        let extinct_year = totals.iter().find(|(_, total)| *total <= 0.0).map(|(year, _)| *year);

        let final_brackets = match self.table.rows().last() {
            Some(row) => self
                .table
                .labels()
                .iter()
                .zip(&row.populations)
                .map(|(label, &population)| BracketTotal {
                    label: label.clone(),
                    population,
                })
                .collect(),
            None => Vec::new(),
        };

        ProjectionSummary {
            start_year,
            end_year,
            initial_total,
            final_total,
            peak_year,
            peak_total: peak_total.max(0.0),
            total_births: self.flows.iter().map(|f| f.births).sum(),
            total_deaths: self.flows.iter().map(|f| f.deaths).sum(),
            total_exits: self.flows.iter().map(|f| f.exits).sum(),
            total_culled: self.flows.iter().map(|f| f.culled).sum(),
            extinct_year,
            final_brackets,
        }
    }
}

/// One bracket's population in the final year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketTotal {
    pub label: String,
    pub population: f64,
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSummary {
    pub start_year: i32,
    pub end_year: i32,
    pub initial_total: f64,
    pub final_total: f64,
    pub peak_year: i32,
    pub peak_total: f64,
    pub total_births: f64,
    pub total_deaths: f64,
    pub total_exits: f64,
    pub total_culled: f64,
    /// First year with no population left
    pub extinct_year: Option<i32>,
    pub final_brackets: Vec<BracketTotal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> BracketTable {
        let mut table = BracketTable::new(vec!["0-14".to_string(), "15+".to_string()]);
        table.push(BracketRow { year: 1900, populations: vec![10.0, 20.5] });
        table.push(BracketRow { year: 1901, populations: vec![12.25, 0.0] });
        table
    }

    #[test]
    fn test_csv_wire_format() {
        let mut buf = Vec::new();
        sample_table().write_csv(&mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "year,0-14,15+\n1900,10,20.5\n1901,12.25,0\n");
    }

    #[test]
    fn test_column_lookup() {
        let table = sample_table();
        assert_eq!(table.column("15+"), Some(vec![20.5, 0.0]));
        assert_eq!(table.column("missing"), None);
        assert_eq!(table.row(1901).map(|r| r.total()), Some(12.25));
    }

    #[test]
    fn test_write_to_dir() {
        let dir = std::env::temp_dir().join(format!("cohort_output_test_{}", std::process::id()));
        sample_table().write_to_dir(&dir).unwrap();

        let written = std::fs::read_to_string(dir.join(OUTPUT_FILE)).unwrap();
        assert!(written.starts_with("year,0-14,15+\n"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_summary_of_empty_result() {
        let result = ProjectionResult {
            matrix: PopulationMatrix::with_capacity(1900, 3, 0),
            flows: Vec::new(),
            table: BracketTable::new(vec!["all".to_string()]),
        };
        let summary = result.summary();
        assert_eq!(summary.final_total, 0.0);
        assert!(summary.final_brackets.is_empty());
    }
}
