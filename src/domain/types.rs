//! Shared domain types.
//!
//! Result records are plain values: they are recomputed per query and carry no
//! identity. Ratios that divide by DV01 are `Option<f64>`; `None` marks an
//! undefined ratio (DV01 numerically zero) and is left to the presentation layer.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::curve::{CurvePoint, YieldCurve};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::io::export::ExportConfig;
use crate::scenario::Scenario;

/// A fixed-coupon bond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondSpec {
    /// Years to maturity (> 0).
    pub maturity_years: f64,
    /// Annual coupon rate (decimal).
    pub coupon: f64,
    /// Coupon payments per year (> 0).
    pub frequency: u32,
    /// Face value (> 0).
    pub face: f64,
}

impl BondSpec {
    pub const DEFAULT_FREQUENCY: u32 = 2;
    pub const DEFAULT_FACE: f64 = 100.0;

    /// Semiannual bond with face 100.
    pub fn new(maturity_years: f64, coupon: f64) -> AnalyticsResult<Self> {
        Self::with_terms(
            maturity_years,
            coupon,
            Self::DEFAULT_FREQUENCY,
            Self::DEFAULT_FACE,
        )
    }

    pub fn with_terms(
        maturity_years: f64,
        coupon: f64,
        frequency: u32,
        face: f64,
    ) -> AnalyticsResult<Self> {
        let spec = Self {
            maturity_years,
            coupon,
            frequency,
            face,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Bond whose coupon equals the curve yield at its maturity.
    pub fn at_par(
        curve: &YieldCurve,
        maturity_years: f64,
        frequency: u32,
        face: f64,
    ) -> AnalyticsResult<Self> {
        Self::with_terms(maturity_years, curve.interpolate(maturity_years), frequency, face)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        let reason = if !(self.maturity_years.is_finite() && self.maturity_years > 0.0) {
            format!("maturity {} must be finite and > 0", self.maturity_years)
        } else if !self.coupon.is_finite() {
            format!("coupon {} must be finite", self.coupon)
        } else if self.frequency == 0 {
            "payment frequency must be > 0".to_string()
        } else if !(self.face.is_finite() && self.face > 0.0) {
            format!("face {} must be finite and > 0", self.face)
        } else {
            return Ok(());
        };
        Err(AnalyticsError::InvalidBond { reason })
    }
}

/// Coarse curve segment used to frame trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CurveBucket {
    FrontEnd,
    Belly,
    LongEnd,
}

impl CurveBucket {
    /// `<= 2y` front end, `<= 10y` belly, otherwise long end.
    pub fn for_maturity(maturity_years: f64) -> Self {
        if maturity_years <= 2.0 {
            CurveBucket::FrontEnd
        } else if maturity_years <= 10.0 {
            CurveBucket::Belly
        } else {
            CurveBucket::LongEnd
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CurveBucket::FrontEnd => "Front End",
            CurveBucket::Belly => "Belly",
            CurveBucket::LongEnd => "Long End",
        }
    }
}

/// A holding-period horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horizon {
    pub label: String,
    pub years: f64,
}

impl Horizon {
    pub fn months(months: u32) -> Self {
        Self {
            label: format!("{months}M"),
            years: f64::from(months) / 12.0,
        }
    }

    /// 1M, 3M, 6M and 12M.
    pub fn standard_set() -> Vec<Horizon> {
        [1, 3, 6, 12].into_iter().map(Horizon::months).collect()
    }
}

/// Carry and roll-down for one bond over one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnRecord {
    pub maturity: f64,
    pub initial_yield: f64,
    pub carry: f64,
    pub rolldown: f64,
}

impl ReturnRecord {
    pub fn carry_plus_roll(&self) -> f64 {
        self.carry + self.rolldown
    }
}

/// Carry/roll scaled by interest-rate risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyRecord {
    pub maturity: f64,
    pub carry: f64,
    pub rolldown: f64,
    pub dv01: f64,
    pub carry_per_dv01: Option<f64>,
    pub carry_plus_roll_per_dv01: Option<f64>,
}

/// An efficiency record tagged with its curve bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramingRecord {
    pub bucket: CurveBucket,
    pub efficiency: EfficiencyRecord,
}

/// Total-return decomposition for one bond under one shocked curve.
///
/// `total_return == carry + rolldown + shift_pnl` holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub maturity: f64,
    pub initial_yield: f64,
    pub dv01: f64,
    pub carry: f64,
    pub rolldown: f64,
    pub shift_pnl: f64,
    pub total_return: f64,
    pub total_per_dv01: Option<f64>,
}

/// A scenario decomposition labelled with its scenario name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub record: ScenarioRecord,
}

/// Carry + roll per DV01 for one bond at one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonRecord {
    pub horizon: Horizon,
    pub maturity: f64,
    pub carry_plus_roll_per_dv01: Option<f64>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Load the curve from a snapshot JSON instead of fetching FRED.
    pub curve_path: Option<PathBuf>,
    /// Write the curve used for the run as snapshot JSON.
    pub save_curve: Option<PathBuf>,
    /// FRED observation window (days back from today).
    pub lookback_days: i64,

    pub maturities: Vec<f64>,
    pub frequency: u32,
    pub face: f64,

    /// Horizon for the base-case, efficiency and scenario tables.
    pub horizon: Horizon,
    /// Horizons for the sensitivity table.
    pub horizons: Vec<Horizon>,
    /// Yield bump (decimal) for the duration central difference.
    pub bump: f64,
    pub scenarios: Vec<Scenario>,

    /// CSV export target; `None` disables exports.
    pub export: Option<ExportConfig>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            curve_path: None,
            save_curve: None,
            lookback_days: 30,
            maturities: vec![2.0, 5.0, 10.0, 30.0],
            frequency: BondSpec::DEFAULT_FREQUENCY,
            face: BondSpec::DEFAULT_FACE,
            horizon: Horizon::months(3),
            horizons: Horizon::standard_set(),
            bump: crate::analytics::DEFAULT_DURATION_BUMP,
            scenarios: Scenario::standard_set(),
            export: None,
        }
    }
}

/// A saved curve snapshot (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub asof_date: NaiveDate,
    pub source: String,
    pub points: Vec<CurvePoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        assert_eq!(CurveBucket::for_maturity(0.5), CurveBucket::FrontEnd);
        assert_eq!(CurveBucket::for_maturity(2.0), CurveBucket::FrontEnd);
        assert_eq!(CurveBucket::for_maturity(5.0), CurveBucket::Belly);
        assert_eq!(CurveBucket::for_maturity(10.0), CurveBucket::Belly);
        assert_eq!(CurveBucket::for_maturity(20.0), CurveBucket::LongEnd);
    }

    #[test]
    fn standard_horizons() {
        let labels: Vec<String> = Horizon::standard_set().into_iter().map(|h| h.label).collect();
        assert_eq!(labels, vec!["1M", "3M", "6M", "12M"]);
        assert_eq!(Horizon::months(3).years, 0.25);
    }

    #[test]
    fn bond_spec_validation() {
        assert!(BondSpec::new(10.0, 0.04).is_ok());
        assert!(BondSpec::new(0.0, 0.04).is_err());
        assert!(BondSpec::with_terms(5.0, 0.04, 0, 100.0).is_err());
        assert!(BondSpec::with_terms(5.0, 0.04, 2, -1.0).is_err());
        assert!(BondSpec::new(5.0, f64::INFINITY).is_err());
    }

    #[test]
    fn at_par_uses_curve_yield() {
        let curve = YieldCurve::from_pairs(&[(2.0, 0.04), (10.0, 0.05)]).unwrap();
        let spec = BondSpec::at_par(&curve, 6.0, 2, 100.0).unwrap();
        assert!((spec.coupon - 0.045).abs() < 1e-15);
    }
}
