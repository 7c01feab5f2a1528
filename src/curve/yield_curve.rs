//! Piecewise-linear yield curve.
//!
//! Interpolation model:
//!
//! ```text
//! y(t) = y(t_min)                                  t <= t_min
//! y(t) = y_i + (y_{i+1} - y_i) * (t - t_i) / (t_{i+1} - t_i)   t_i < t < t_{i+1}
//! y(t) = y(t_max)                                  t >= t_max
//! ```
//!
//! Bracketing uses a binary search over the sorted tenors, so queries are
//! `O(log n)` and independent of input order.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// One observed curve point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Tenor in years (> 0).
    pub tenor_years: f64,
    /// Yield as a decimal rate (e.g. `0.0425` for 4.25%).
    pub yield_decimal: f64,
}

impl CurvePoint {
    pub fn new(tenor_years: f64, yield_decimal: f64) -> Self {
        Self {
            tenor_years,
            yield_decimal,
        }
    }
}

/// Immutable yield curve snapshot.
///
/// Invariants (enforced by [`YieldCurve::new`]):
/// - at least one point
/// - tenors finite, strictly positive and unique
/// - yields finite
/// - points sorted by tenor
#[derive(Debug, Clone, PartialEq)]
pub struct YieldCurve {
    points: Vec<CurvePoint>,
}

impl YieldCurve {
    /// Build a curve from points in any order.
    pub fn new(mut points: Vec<CurvePoint>) -> AnalyticsResult<Self> {
        if points.is_empty() {
            return Err(AnalyticsError::EmptyCurve);
        }

        for p in &points {
            if !(p.tenor_years.is_finite() && p.tenor_years > 0.0) {
                return Err(AnalyticsError::InvalidTenor { tenor: p.tenor_years });
            }
            if !p.yield_decimal.is_finite() {
                return Err(AnalyticsError::InvalidYield {
                    tenor: p.tenor_years,
                    yield_: p.yield_decimal,
                });
            }
        }

        points.sort_by(|a, b| a.tenor_years.total_cmp(&b.tenor_years));

        if let Some(dup) = points
            .windows(2)
            .find(|w| w[0].tenor_years == w[1].tenor_years)
        {
            return Err(AnalyticsError::DuplicateTenor {
                tenor: dup[0].tenor_years,
            });
        }

        Ok(Self { points })
    }

    /// Build a curve from `(tenor, yield)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> AnalyticsResult<Self> {
        Self::new(pairs.iter().map(|&(t, y)| CurvePoint::new(t, y)).collect())
    }

    /// A flat curve at `yield_decimal` over the given tenors.
    pub fn flat(tenors: &[f64], yield_decimal: f64) -> AnalyticsResult<Self> {
        Self::new(
            tenors
                .iter()
                .map(|&t| CurvePoint::new(t, yield_decimal))
                .collect(),
        )
    }

    /// Points sorted by tenor.
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false` for a constructed curve.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn tenor_min(&self) -> f64 {
        self.points[0].tenor_years
    }

    pub fn tenor_max(&self) -> f64 {
        self.points[self.points.len() - 1].tenor_years
    }

    /// Interpolated yield at `tenor` (years).
    pub fn interpolate(&self, tenor: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];

        if self.points.len() == 1 || tenor <= first.tenor_years {
            return first.yield_decimal;
        }
        if tenor >= last.tenor_years {
            return last.yield_decimal;
        }

        // First index with tenor >= query; the range checks above keep it in 1..len.
        let hi = self
            .points
            .partition_point(|p| p.tenor_years < tenor)
            .clamp(1, self.points.len() - 1);
        let right = self.points[hi];
        if right.tenor_years == tenor {
            return right.yield_decimal;
        }
        let left = self.points[hi - 1];

        let w = (tenor - left.tenor_years) / (right.tenor_years - left.tenor_years);
        left.yield_decimal + (right.yield_decimal - left.yield_decimal) * w
    }

    /// New curve on the same tenors with yields produced by `f`.
    ///
    /// Tenors (and therefore ordering/uniqueness) are preserved; callers must
    /// return finite yields.
    pub(crate) fn map_yields(&self, f: impl Fn(&CurvePoint) -> f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| CurvePoint::new(p.tenor_years, f(p)))
                .collect(),
        }
    }
}
