//! Named age brackets for reporting

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::output::{BracketRow, BracketTable};
use super::population::PopulationMatrix;
use crate::assumptions::{check_ranges, Coverage};
use crate::error::ConfigError;

/// A named, contiguous age range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBracket {
    pub label: String,
    pub min_age: usize,
    pub max_age: usize,
}

impl AgeBracket {
    pub fn new(label: impl Into<String>, min_age: usize, max_age: usize) -> Self {
        Self {
            label: label.into(),
            min_age,
            max_age,
        }
    }

    /// Population inside the bracket
    pub fn sum(&self, counts: &[f64]) -> f64 {
        counts[self.min_age..=self.max_age].iter().sum()
    }
}

/// Ordered brackets that partition every age exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeBrackets {
    brackets: Vec<AgeBracket>,
    max_age: usize,
}

impl AgeBrackets {
    pub fn new(brackets: Vec<AgeBracket>, max_age: usize) -> Result<Self, ConfigError> {
        check_ranges(
            "age brackets",
            brackets.iter().map(|b| (b.min_age, b.max_age)),
            max_age,
            Coverage::Partition,
        )?;

        let mut labels = HashSet::new();
        for bracket in &brackets {
            if !labels.insert(bracket.label.as_str()) {
                return Err(ConfigError::DuplicateBracketLabel(bracket.label.clone()));
            }
        }

        Ok(Self { brackets, max_age })
    }

    pub fn labels(&self) -> Vec<String> {
        self.brackets.iter().map(|b| b.label.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgeBracket> {
        self.brackets.iter()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    pub fn max_age(&self) -> usize {
        self.max_age
    }

    /// Population per bracket for one year, in bracket order
    pub fn sum(&self, counts: &[f64]) -> Vec<f64> {
        self.brackets.iter().map(|b| b.sum(counts)).collect()
    }

    /// One row per year of the matrix, one column per bracket
    pub fn aggregate(&self, matrix: &PopulationMatrix) -> BracketTable {
        let mut table = BracketTable::new(self.labels());
        for (year, counts) in matrix.iter() {
            table.push(BracketRow {
                year,
                populations: self.sum(counts),
            });
        }
        table
    }
}
