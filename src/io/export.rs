//! Export per-bond results to CSV.
//!
//! Exports go to an explicitly configured directory; nothing is written unless
//! the caller asks for it. Undefined per-DV01 ratios are written as empty cells.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::app::pipeline::RunOutput;
use crate::domain::{EfficiencyRecord, FramingRecord, HorizonRecord, ReturnRecord, ScenarioResult};
use crate::error::AppError;

pub const BASE_CSV: &str = "carry_rolldown_absolute.csv";
pub const EFFICIENCY_CSV: &str = "carry_efficiency_by_tenor.csv";
pub const FRAMING_CSV: &str = "pm_trade_framing_ranked.csv";
pub const SCENARIO_CSV: &str = "scenario_decomp.csv";
pub const HORIZON_CSV: &str = "horizon_sensitivity.csv";

/// Where CSV exports are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

impl ExportConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

/// Write every table of a run. Returns the files written.
pub fn export_run(config: &ExportConfig, run: &RunOutput) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(&config.output_dir).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to create output dir '{}': {e}", config.output_dir.display()),
        )
    })?;

    let written = vec![
        config.path(BASE_CSV),
        config.path(EFFICIENCY_CSV),
        config.path(FRAMING_CSV),
        config.path(SCENARIO_CSV),
        config.path(HORIZON_CSV),
    ];
    write_base_csv(&written[0], &run.base)?;
    write_efficiency_csv(&written[1], &run.efficiency)?;
    write_framing_csv(&written[2], &run.framing)?;
    write_scenario_csv(&written[3], &run.scenarios)?;
    write_horizon_csv(&written[4], &run.horizons)?;

    info!(dir = %config.output_dir.display(), files = written.len(), "exported CSV tables");
    Ok(written)
}

pub fn write_base_csv(path: &Path, rows: &[ReturnRecord]) -> Result<(), AppError> {
    write_csv(
        path,
        &["maturity", "y0", "carry", "rolldown", "carry_plus_roll"],
        rows.iter().map(|r| {
            vec![
                r.maturity.to_string(),
                fmt_f(r.initial_yield),
                fmt_f(r.carry),
                fmt_f(r.rolldown),
                fmt_f(r.carry_plus_roll()),
            ]
        }),
    )
}

pub fn write_efficiency_csv(path: &Path, rows: &[EfficiencyRecord]) -> Result<(), AppError> {
    write_csv(path, &EFFICIENCY_HEADER, rows.iter().map(efficiency_cells))
}

pub fn write_framing_csv(path: &Path, rows: &[FramingRecord]) -> Result<(), AppError> {
    let mut header = EFFICIENCY_HEADER.to_vec();
    header.push("bucket");
    write_csv(
        path,
        &header,
        rows.iter().map(|r| {
            let mut cells = efficiency_cells(&r.efficiency);
            cells.push(r.bucket.display_name().to_string());
            cells
        }),
    )
}

pub fn write_scenario_csv(path: &Path, rows: &[ScenarioResult]) -> Result<(), AppError> {
    write_csv(
        path,
        &[
            "scenario",
            "maturity",
            "y0",
            "dv01",
            "carry",
            "rolldown",
            "shift_pnl",
            "total_return",
            "total_per_dv01",
        ],
        rows.iter().map(|r| {
            let s = &r.record;
            vec![
                r.scenario.clone(),
                s.maturity.to_string(),
                fmt_f(s.initial_yield),
                fmt_f(s.dv01),
                fmt_f(s.carry),
                fmt_f(s.rolldown),
                fmt_f(s.shift_pnl),
                fmt_f(s.total_return),
                fmt_opt(s.total_per_dv01),
            ]
        }),
    )
}

pub fn write_horizon_csv(path: &Path, rows: &[HorizonRecord]) -> Result<(), AppError> {
    write_csv(
        path,
        &["horizon", "maturity", "carry_plus_roll_per_dv01"],
        rows.iter().map(|r| {
            vec![
                r.horizon.label.clone(),
                r.maturity.to_string(),
                fmt_opt(r.carry_plus_roll_per_dv01),
            ]
        }),
    )
}

const EFFICIENCY_HEADER: [&str; 6] = [
    "maturity",
    "carry",
    "rolldown",
    "dv01",
    "carry_per_dv01",
    "carry_plus_roll_per_dv01",
];

fn efficiency_cells(r: &EfficiencyRecord) -> Vec<String> {
    vec![
        r.maturity.to_string(),
        fmt_f(r.carry),
        fmt_f(r.rolldown),
        fmt_f(r.dv01),
        fmt_opt(r.carry_per_dv01),
        fmt_opt(r.carry_plus_roll_per_dv01),
    ]
}

fn write_csv(
    path: &Path,
    header: &[&str],
    rows: impl Iterator<Item = Vec<String>>,
) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writer
        .write_record(header)
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }
    writer.flush().map_err(|e| {
        AppError::new(4, format!("Failed to flush export CSV '{}': {e}", path.display()))
    })?;

    Ok(())
}

fn fmt_f(v: f64) -> String {
    format!("{v:.10}")
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(fmt_f).unwrap_or_default()
}
