//! Projection state and the one-year recurrence

use serde::Serialize;

use super::engine::CullRule;
use super::population::PopulationVector;
use crate::assumptions::RateTables;

/// Population flows produced by one simulated year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearFlows {
    pub year: i32,
    /// 1 for the first simulated year
    pub step_index: u32,
    pub births: f64,
    pub deaths: f64,
    /// Survivors of the top age who aged out of the model
    pub exits: f64,
    /// Removed by the painted-age cull
    pub culled: f64,
    /// Cull threshold in force this year, if within the age range
    pub painted_age: Option<usize>,
}

impl YearFlows {
    /// Net change in total population over the year
    pub fn net_change(&self) -> f64 {
        self.births - self.deaths - self.exits - self.culled
    }
}

/// Painted age for a step: `max_age - step_index + 1`, if it lies in `[0, max_age]`
pub fn painted_age(step_index: u32, max_age: usize) -> Option<usize> {
    let threshold = max_age as i64 - step_index as i64 + 1;
    if (0..=max_age as i64).contains(&threshold) {
        Some(threshold as usize)
    } else {
        None
    }
}

/// Population of the city at a point in the projection
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Steps taken so far (0 = start year)
    pub step_index: u32,
    pub year: i32,
    population: PopulationVector,
}

impl ProjectionState {
    /// Initialize state at the start year
    pub fn new(start_year: i32, initial: PopulationVector) -> Self {
        Self {
            step_index: 0,
            year: start_year,
            population: initial,
        }
    }

    pub fn population(&self) -> &PopulationVector {
        &self.population
    }

    /// Advance one year: mortality, aging, births, then the cull
    ///
    /// Births are drawn from the post-mortality survivors, and the cull runs
    /// last so it removes newborns and survivors alike.
    pub fn advance_year(&mut self, tables: &RateTables, female_share: f64, cull: CullRule) -> YearFlows {
        self.step_index += 1;
        self.year += 1;

        let counts = self.population.as_mut_slice();
        let Some(max_age) = counts.len().checked_sub(1) else {
            return YearFlows {
                year: self.year,
                step_index: self.step_index,
                births: 0.0,
                deaths: 0.0,
                exits: 0.0,
                culled: 0.0,
                painted_age: None,
            };
        };

        // Mortality
        let mut deaths = 0.0;
        for (age, count) in counts.iter_mut().enumerate() {
            let survivors = *count * tables.mortality.survival_rate(age);
            deaths += *count - survivors;
            *count = survivors;
        }

        let births = counts
            .iter()
            .zip(tables.fertility.rates())
            .map(|(count, rate)| count * rate)
            .sum::<f64>()
            * female_share;

        // Aging: the top slot wraps to age 0 and is overwritten by the newborns
        let exits = counts[max_age];
        counts.rotate_right(1);
        counts[0] = births;

        let painted = match cull {
            CullRule::PaintedAge => painted_age(self.step_index, max_age),
            CullRule::Disabled => None,
        };
        let culled = match painted {
            Some(age) => {
                let removed: f64 = counts[age..].iter().sum();
                counts[age..].fill(0.0);
                removed
            }
            None => 0.0,
        };

        YearFlows {
            year: self.year,
            step_index: self.step_index,
            births,
            deaths,
            exits,
            culled,
            painted_age: painted,
        }
    }
}
