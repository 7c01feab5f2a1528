//! Read/write curve snapshot JSON files.
//!
//! A snapshot file pins the exact curve a run used, so analyses can be replayed
//! offline without refetching FRED. The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::curve::YieldCurve;
use crate::domain::CurveFile;
use crate::error::AppError;

pub const TOOL_NAME: &str = "carry";

/// Describe `curve` as a snapshot file.
pub fn curve_file(curve: &YieldCurve, asof_date: NaiveDate, source: &str) -> CurveFile {
    CurveFile {
        tool: TOOL_NAME.to_string(),
        asof_date,
        source: source.to_string(),
        points: curve.points().to_vec(),
    }
}

/// Write a curve snapshot JSON file.
pub fn write_curve_json(path: &Path, curve: &CurveFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    info!(path = %path.display(), points = curve.points.len(), "wrote curve snapshot");
    Ok(())
}

/// Read a curve snapshot JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display()))
    })?;
    let curve: CurveFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

/// Read a snapshot and validate it into a `YieldCurve`.
pub fn load_curve(path: &Path) -> Result<(CurveFile, YieldCurve), AppError> {
    let file = read_curve_json(path)?;
    let curve = YieldCurve::new(file.points.clone()).map_err(|e| {
        AppError::new(2, format!("Invalid curve in '{}': {e}", path.display()))
    })?;
    Ok((file, curve))
}
