//! Shared analysis pipeline.
//!
//! The workflow lives in one place:
//! curve snapshot -> par bonds -> base carry/roll -> efficiency + framing
//! -> scenario decomposition -> horizon sensitivity
//!
//! Front-ends then only deal with presentation (printing vs exporting).

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::analytics::returns::check_horizon;
use crate::analytics::{
    carry_efficiency_with_bump, frame_by_bucket, horizon_sensitivity, total_expected_return,
};
use crate::curve::YieldCurve;
use crate::data::FredClient;
use crate::domain::{
    AnalysisConfig, BondSpec, EfficiencyRecord, FramingRecord, HorizonRecord, ReturnRecord,
    ScenarioResult,
};
use crate::error::{AnalyticsResult, AppError};
use crate::io::curve::{curve_file, load_curve, write_curve_json};
use crate::scenario::run_scenarios;

/// Where the run's curve came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSource {
    pub asof_date: NaiveDate,
    pub source: String,
}

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub curve: YieldCurve,
    pub source: CurveSource,
    pub bonds: Vec<BondSpec>,
    pub base: Vec<ReturnRecord>,
    pub efficiency: Vec<EfficiencyRecord>,
    pub framing: Vec<FramingRecord>,
    /// Ordered by scenario (config order), then bond.
    pub scenarios: Vec<ScenarioResult>,
    /// Ordered by horizon (config order), then bond.
    pub horizons: Vec<HorizonRecord>,
}

/// Resolve the curve for a run: snapshot file if configured, FRED otherwise.
pub fn resolve_curve(config: &AnalysisConfig) -> Result<(YieldCurve, CurveSource), AppError> {
    let (curve, source) = match &config.curve_path {
        Some(path) => {
            let (file, curve) = load_curve(path)?;
            info!(path = %path.display(), asof = %file.asof_date, "loaded curve snapshot");
            (
                curve,
                CurveSource {
                    asof_date: file.asof_date,
                    source: file.source,
                },
            )
        }
        None => {
            let client = FredClient::from_env()?;
            let snapshot = client.fetch_treasury_curve(config.lookback_days)?;
            for stale in snapshot.stale_series() {
                info!(
                    series = %stale.series_id,
                    date = %stale.date,
                    "series older than snapshot date"
                );
            }
            (
                snapshot.curve,
                CurveSource {
                    asof_date: snapshot.asof_date,
                    source: "FRED".to_string(),
                },
            )
        }
    };

    if let Some(path) = &config.save_curve {
        write_curve_json(path, &curve_file(&curve, source.asof_date, &source.source))?;
    }

    Ok((curve, source))
}

/// Execute the full pipeline, fetching or loading the curve first.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let (curve, source) = resolve_curve(config)?;
    run_with_curve(config, curve, source)
}

/// Execute the pipeline against an already-resolved curve.
pub fn run_with_curve(
    config: &AnalysisConfig,
    curve: YieldCurve,
    source: CurveSource,
) -> Result<RunOutput, AppError> {
    validate_config(config)?;

    let bonds = par_bonds(&curve, config)?;
    debug!(bonds = bonds.len(), horizon = %config.horizon.label, "built par bonds");

    let h = config.horizon.years;

    let base = bonds
        .par_iter()
        .map(|b| total_expected_return(b, &curve, h))
        .collect::<AnalyticsResult<Vec<_>>>()?;

    let efficiency = bonds
        .par_iter()
        .map(|b| carry_efficiency_with_bump(b, &curve, h, config.bump))
        .collect::<AnalyticsResult<Vec<_>>>()?;
    let framing = frame_by_bucket(&efficiency);

    let scenarios = run_scenarios(&bonds, &curve, &config.scenarios, h, config.bump)?;

    let per_bond = bonds
        .par_iter()
        .map(|b| horizon_sensitivity(b, &curve, &config.horizons, config.bump))
        .collect::<AnalyticsResult<Vec<_>>>()?;
    let horizons = (0..config.horizons.len())
        .flat_map(|hi| per_bond.iter().map(move |rows| rows[hi].clone()))
        .collect();

    info!(
        bonds = bonds.len(),
        scenarios = config.scenarios.len(),
        horizons = config.horizons.len(),
        "analysis complete"
    );

    Ok(RunOutput {
        curve,
        source,
        bonds,
        base,
        efficiency,
        framing,
        scenarios,
        horizons,
    })
}

/// One par bond per configured maturity.
pub fn par_bonds(curve: &YieldCurve, config: &AnalysisConfig) -> AnalyticsResult<Vec<BondSpec>> {
    config
        .maturities
        .iter()
        .map(|&m| BondSpec::at_par(curve, m, config.frequency, config.face))
        .collect()
}

/// Source label for curves supplied directly by a test.
#[cfg(test)]
pub(crate) fn manual_source() -> CurveSource {
    CurveSource {
        asof_date: chrono::Local::now().date_naive(),
        source: "manual".to_string(),
    }
}

fn validate_config(config: &AnalysisConfig) -> Result<(), AppError> {
    if config.maturities.is_empty() {
        return Err(AppError::new(2, "At least one maturity is required."));
    }
    for (i, m) in config.maturities.iter().enumerate() {
        if config.maturities[..i].contains(m) {
            return Err(AppError::new(2, format!("Duplicate maturity {m}y.")));
        }
    }
    if config.scenarios.is_empty() {
        return Err(AppError::new(2, "At least one scenario is required."));
    }
    check_horizon(config.horizon.years)?;
    for h in &config.horizons {
        check_horizon(h.years)?;
    }
    Ok(())
}
