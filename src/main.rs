//! Cohort Projection CLI
//!
//! Command-line interface for running population projections

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use cohort_projection::projection::{
    ProjectionSummary, DEFAULT_END_YEAR, DEFAULT_FEMALE_SHARE, DEFAULT_INITIAL_POPULATION,
    DEFAULT_MAX_AGE, DEFAULT_START_YEAR, OUTPUT_FILE,
};
use cohort_projection::{Assumptions, CullRule, ProjectionConfig, ProjectionResult, ScenarioRunner};

/// Project a city's population by single year of age under a painted-age cull
#[derive(Parser, Debug)]
#[command(name = "cohort-projection", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the projection and write population.csv
    Simulate {
        #[command(flatten)]
        run: RunArgs,

        /// Directory receiving population.csv
        #[arg(long, default_value = "data/generated")]
        output_dir: PathBuf,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the bracket table to stdout
    Summary {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Compare the run against the same scenario without the cull
    Compare {
        #[command(flatten)]
        run: RunArgs,

        /// Print the per-year shortfall as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Directory of assumption CSVs (built-in 1901 values when omitted)
    #[arg(long)]
    assumptions: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_START_YEAR)]
    start_year: i32,

    #[arg(long, default_value_t = DEFAULT_END_YEAR)]
    end_year: i32,

    #[arg(long, default_value_t = DEFAULT_MAX_AGE)]
    max_age: usize,

    #[arg(long, default_value_t = DEFAULT_INITIAL_POPULATION)]
    initial_population: f64,

    /// Fraction of each cohort contributing births
    #[arg(long, default_value_t = DEFAULT_FEMALE_SHARE)]
    female_share: f64,

    /// Override the total fertility rate of the assumptions
    #[arg(long)]
    tfr: Option<f64>,

    /// Disable the painted-age cull
    #[arg(long)]
    no_cull: bool,
}

impl RunArgs {
    fn runner(&self) -> Result<ScenarioRunner> {
        let mut assumptions = match &self.assumptions {
            Some(dir) => Assumptions::from_csv_path(dir)
                .with_context(|| format!("Failed to load assumptions from {}", dir.display()))?,
            None => Assumptions::paris_1901(),
        };
        if let Some(tfr) = self.tfr {
            assumptions.fertility.tfr = tfr;
        }
        Ok(ScenarioRunner::with_assumptions(assumptions))
    }

    fn config(&self) -> ProjectionConfig {
        ProjectionConfig {
            start_year: self.start_year,
            end_year: self.end_year,
            max_age: self.max_age,
            initial_total_population: self.initial_population,
            female_share: self.female_share,
            cull: if self.no_cull { CullRule::Disabled } else { CullRule::PaintedAge },
        }
    }

    fn project(&self) -> Result<ProjectionResult> {
        let result = self
            .runner()?
            .run(self.config())
            .context("Invalid projection configuration")?;
        Ok(result)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Simulate { run, output_dir, json } => simulate(&run, &output_dir, json),
        Command::Summary { run } => summary(&run),
        Command::Compare { run, json } => compare(&run, json),
    }
}

fn simulate(run: &RunArgs, output_dir: &Path, json: bool) -> Result<()> {
    let result = run.project()?;

    let csv_path = output_dir.join(OUTPUT_FILE);
    result
        .table
        .write_to_dir(output_dir)
        .with_context(|| format!("Unable to write {}", csv_path.display()))?;

    let summary = result.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
        println!("\nFull results written to: {}", csv_path.display());
    }

    Ok(())
}

fn summary(run: &RunArgs) -> Result<()> {
    let result = run.project()?;
    let labels = result.table.labels();

    print!("{:>5}", "Year");
    for label in labels {
        print!(" {:>12}", label);
    }
    println!(" {:>12}", "Total");
    println!("{}", "-".repeat(5 + 13 * (labels.len() + 1)));

    for row in result.table.rows() {
        print!("{:>5}", row.year);
        for population in &row.populations {
            print!(" {:>12.0}", population);
        }
        println!(" {:>12.0}", row.total());
    }

    println!();
    print_summary(&result.summary());
    Ok(())
}

fn compare(run: &RunArgs, json: bool) -> Result<()> {
    let comparison = run
        .runner()?
        .compare(run.config())
        .context("Invalid projection configuration")?;
    let shortfall = comparison.shortfall_by_year();

    if json {
        println!("{}", serde_json::to_string_pretty(&shortfall)?);
        return Ok(());
    }

    println!("{:>5} {:>14} {:>14} {:>14}", "Year", "Culled", "No cull", "Shortfall");
    println!("{}", "-".repeat(50));
    for year in &shortfall {
        println!(
            "{:>5} {:>14.0} {:>14.0} {:>14.0}",
            year.year, year.culled_total, year.counterfactual_total, year.shortfall
        );
    }

    Ok(())
}

fn print_summary(summary: &ProjectionSummary) {
    println!("Summary ({}-{}):", summary.start_year, summary.end_year);
    println!("  Initial population: {:.0}", summary.initial_total);
    println!("  Final population:   {:.0}", summary.final_total);
    println!("  Peak population:    {:.0} ({})", summary.peak_total, summary.peak_year);
    println!("  Births:             {:.0}", summary.total_births);
    println!("  Deaths:             {:.0}", summary.total_deaths);
    println!("  Aged out:           {:.0}", summary.total_exits);
    println!("  Culled:             {:.0}", summary.total_culled);
    if let Some(year) = summary.extinct_year {
        println!("  No population left from {}", year);
    }

    println!("\nFinal year by age group:");
    for bracket in &summary.final_brackets {
        println!("  {:>8}: {:.0}", bracket.label, bracket.population);
    }
}
