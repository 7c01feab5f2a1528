//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the bond definition (`BondSpec`) and curve buckets (`CurveBucket`)
//! - per-bond result records (`ReturnRecord`, `EfficiencyRecord`, `ScenarioRecord`, ...)
//! - the run configuration (`AnalysisConfig`) and curve snapshot file (`CurveFile`)

pub mod types;

pub use types::*;
