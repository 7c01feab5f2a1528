//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches or loads the Treasury curve
//! - runs the carry / roll-down / scenario pipeline
//! - prints reports and writes optional exports

use clap::Parser;
use tracing::info;

use crate::analytics::{dv01_with_bump, modified_duration_with_bump, BASIS_POINT};
use crate::cli::{AnalyzeArgs, Command, FetchArgs, PriceArgs};
use crate::data::FredClient;
use crate::domain::{AnalysisConfig, BondSpec, Horizon};
use crate::error::AppError;
use crate::io::curve::{curve_file, write_curve_json};
use crate::io::export::{export_run, ExportConfig};
use crate::pricing::price;
use crate::scenario::Scenario;

pub mod pipeline;

/// Entry point for the `carry` binary.
pub fn run() -> Result<(), AppError> {
    // We want `carry` and `carry --curve x.json` to behave like `carry analyze ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Fetch(args) => handle_fetch(args),
        Command::Price(args) => handle_price(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    println!("{}", crate::report::format_report(&run, &config));

    if let Some(export) = &config.export {
        let written = export_run(export, &run)?;
        println!("Saved CSV outputs:");
        for path in written {
            println!("- {}", path.display());
        }
    }

    Ok(())
}

fn handle_fetch(args: FetchArgs) -> Result<(), AppError> {
    let client = FredClient::from_env()?;
    let snapshot = client.fetch_treasury_curve(args.lookback_days)?;

    println!("Treasury curve as of {} (FRED):", snapshot.asof_date);
    println!("{}", crate::report::format_curve(&snapshot.curve));
    for stale in snapshot.stale_series() {
        println!("note: {} last observed {}", stale.series_id, stale.date);
    }

    if let Some(path) = &args.save {
        write_curve_json(path, &curve_file(&snapshot.curve, snapshot.asof_date, "FRED"))?;
        println!("Saved curve snapshot: {}", path.display());
    }

    Ok(())
}

fn handle_price(args: PriceArgs) -> Result<(), AppError> {
    let spec = BondSpec::with_terms(args.maturity, args.coupon, args.frequency, args.face)?;
    let bump = args.bump_bp * BASIS_POINT;

    let p = price(&spec, args.yield_)?;
    let duration = modified_duration_with_bump(&spec, args.yield_, bump)?;
    let dv01 = dv01_with_bump(&spec, args.yield_, bump)?;
    info!(maturity = spec.maturity_years, yield_ = args.yield_, price = p, "priced bond");

    println!(
        "{}",
        crate::report::format_bond_risk(&spec, args.yield_, p, duration, dv01)
    );
    Ok(())
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    let scenarios = if args.scenarios.is_empty() {
        Scenario::standard_set()
    } else {
        args.scenarios.clone()
    };

    AnalysisConfig {
        curve_path: args.curve.clone(),
        save_curve: args.save_curve.clone(),
        lookback_days: args.lookback_days,
        maturities: args.maturities.clone(),
        frequency: args.frequency,
        face: args.face,
        horizon: Horizon::months(args.horizon_months),
        horizons: args.horizons.iter().copied().map(Horizon::months).collect(),
        bump: args.bump_bp * BASIS_POINT,
        scenarios,
        export: args.output_dir.clone().map(ExportConfig::new),
    }
}

/// Rewrite argv so `carry` defaults to `carry analyze`.
///
/// Rules:
/// - `carry`                      -> `carry analyze`
/// - `carry --curve c.json ...`   -> `carry analyze --curve c.json ...`
/// - `carry --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "fetch" | "price");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "analyze flags".
    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
