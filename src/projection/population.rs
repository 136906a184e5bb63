//! Per-age population vectors and the year-indexed matrix that records them

use serde::Serialize;

/// Population alive at each single year of age (index = age)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationVector {
    counts: Vec<f64>,
}

impl PopulationVector {
    /// Empty population covering ages `0..=max_age`
    pub fn zeros(max_age: usize) -> Self {
        Self {
            counts: vec![0.0; max_age + 1],
        }
    }

    pub fn from_counts(counts: Vec<f64>) -> Self {
        Self { counts }
    }

    /// Number of age slots (max age + 1)
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn max_age(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    /// Population at `age`; zero beyond the last slot
    pub fn get(&self, age: usize) -> f64 {
        self.counts.get(age).copied().unwrap_or(0.0)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.counts
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.counts
    }

    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }
}

/// Append-only log of population vectors, one row per year
///
/// Rows live in one contiguous buffer sized for the whole run up front, so
/// recording a year never reallocates.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationMatrix {
    start_year: i32,
    width: usize,
    data: Vec<f64>,
}

impl PopulationMatrix {
    /// Reserve room for `years` rows of `max_age + 1` ages
    pub fn with_capacity(start_year: i32, max_age: usize, years: usize) -> Self {
        let width = max_age + 1;
        Self {
            start_year,
            width,
            data: Vec::with_capacity(width * years),
        }
    }

    /// Record the next year's vector
    pub(crate) fn push(&mut self, row: &PopulationVector) {
        debug_assert_eq!(row.len(), self.width);
        self.data.extend_from_slice(row.as_slice());
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Last recorded year, if any row exists
    pub fn end_year(&self) -> Option<i32> {
        match self.len() {
            0 => None,
            n => Some(self.start_year + n as i32 - 1),
        }
    }

    /// Number of recorded years
    pub fn len(&self) -> usize {
        self.data.len() / self.width
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Per-age population for `year`
    pub fn row(&self, year: i32) -> Option<&[f64]> {
        let offset = usize::try_from(year.checked_sub(self.start_year)?).ok()?;
        if offset >= self.len() {
            return None;
        }
        let start = offset * self.width;
        Some(&self.data[start..start + self.width])
    }

    /// Iterate `(year, per-age population)` in increasing year order
    pub fn iter(&self) -> impl Iterator<Item = (i32, &[f64])> + '_ {
        self.data
            .chunks_exact(self.width)
            .enumerate()
            .map(move |(i, row)| (self.start_year + i as i32, row))
    }

    /// Total population per year
    pub fn totals(&self) -> Vec<f64> {
        self.iter().map(|(_, row)| row.iter().sum()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_basics() {
        let v = PopulationVector::from_counts(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert_eq!(v.max_age(), 2);
        assert_eq!(v.get(1), 2.0);
        assert_eq!(v.get(7), 0.0);
        assert_eq!(v.total(), 6.0);
        assert_eq!(PopulationVector::zeros(4).len(), 5);
    }

    #[test]
    fn test_matrix_rows_by_year() {
        let mut matrix = PopulationMatrix::with_capacity(1900, 2, 3);
        assert!(matrix.is_empty());
        assert_eq!(matrix.end_year(), None);

        matrix.push(&PopulationVector::from_counts(vec![1.0, 1.0, 1.0]));
        matrix.push(&PopulationVector::from_counts(vec![2.0, 0.5, 0.0]));

        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.end_year(), Some(1901));
        assert_eq!(matrix.row(1901), Some(&[2.0, 0.5, 0.0][..]));
        assert_eq!(matrix.row(1899), None);
        assert_eq!(matrix.row(1902), None);
        assert_eq!(matrix.totals(), vec![3.0, 2.5]);

        let years: Vec<i32> = matrix.iter().map(|(year, _)| year).collect();
        assert_eq!(years, vec![1900, 1901]);
    }
}
