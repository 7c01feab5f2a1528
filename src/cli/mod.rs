//! Command-line parsing for the Treasury carry / roll-down analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analytics code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::scenario::Scenario;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "carry", version, about = "Treasury Carry & Roll-Down Analyzer (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price par bonds off the curve and report carry, roll-down, efficiency and scenarios.
    Analyze(AnalyzeArgs),
    /// Fetch the FRED Treasury curve, print it, and optionally save it as JSON.
    Fetch(FetchArgs),
    /// Price a single bond at a given yield and report duration and DV01.
    Price(PriceArgs),
}

/// Options for a full analysis run.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Curve snapshot JSON to analyze instead of fetching from FRED.
    #[arg(long, value_name = "JSON")]
    pub curve: Option<PathBuf>,

    /// Bond maturities in years (comma-separated).
    #[arg(
        short = 'm',
        long,
        value_delimiter = ',',
        default_values_t = [2.0, 5.0, 10.0, 30.0]
    )]
    pub maturities: Vec<f64>,

    /// Holding horizon (months) for the base, efficiency and scenario tables.
    #[arg(long, default_value_t = 3)]
    pub horizon_months: u32,

    /// Horizons (months) for the sensitivity table (comma-separated).
    #[arg(long, value_delimiter = ',', default_values_t = [1, 3, 6, 12])]
    pub horizons: Vec<u32>,

    /// Coupon payments per year.
    #[arg(long, default_value_t = 2)]
    pub frequency: u32,

    /// Face value.
    #[arg(long, default_value_t = 100.0)]
    pub face: f64,

    /// Yield bump (bp) for the duration central difference.
    #[arg(long, default_value_t = 1.0)]
    pub bump_bp: f64,

    /// Curve scenario: `[NAME=]base`, `parallel:<bp>` or `twist:<front_bp>:<long_bp>`.
    ///
    /// Repeat for several scenarios. Defaults to base, +100bp parallel,
    /// bear steepener and bull flattener.
    #[arg(short = 's', long = "scenario", value_name = "SCENARIO")]
    pub scenarios: Vec<Scenario>,

    /// FRED observation window in days.
    #[arg(long, default_value_t = 30)]
    pub lookback_days: i64,

    /// Write CSV tables into this directory.
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Save the curve used for the run as snapshot JSON.
    #[arg(long, value_name = "JSON")]
    pub save_curve: Option<PathBuf>,
}

/// Options for fetching the curve.
#[derive(Debug, Parser)]
pub struct FetchArgs {
    /// FRED observation window in days.
    #[arg(long, default_value_t = 30)]
    pub lookback_days: i64,

    /// Write the curve as snapshot JSON.
    #[arg(long, value_name = "JSON")]
    pub save: Option<PathBuf>,
}

/// Options for pricing a single bond.
#[derive(Debug, Parser)]
pub struct PriceArgs {
    /// Years to maturity.
    #[arg(long)]
    pub maturity: f64,

    /// Annual coupon rate (decimal, e.g. 0.04).
    #[arg(long)]
    pub coupon: f64,

    /// Yield to price at (decimal, e.g. 0.045).
    #[arg(long = "yield", value_name = "YIELD")]
    pub yield_: f64,

    /// Coupon payments per year.
    #[arg(long, default_value_t = 2)]
    pub frequency: u32,

    /// Face value.
    #[arg(long, default_value_t = 100.0)]
    pub face: f64,

    /// Yield bump (bp) for the duration central difference.
    #[arg(long, default_value_t = 1.0)]
    pub bump_bp: f64,
}
