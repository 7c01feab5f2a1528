//! Modified duration and DV01 by central difference.
//!
//! ```text
//! D_mod = -(P(y + h) - P(y - h)) / (2 * h * P(y))
//! DV01  = D_mod * F * 0.0001
//! ```
//!
//! The bump `h` defaults to 1bp. Larger bumps leak convexity into the estimate;
//! much smaller ones lose precision to cancellation.

use tracing::warn;

use crate::domain::BondSpec;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::pricing::price;

/// One basis point as a decimal rate.
pub const BASIS_POINT: f64 = 0.0001;

/// Default yield bump for the duration central difference.
pub const DEFAULT_DURATION_BUMP: f64 = 0.0001;

/// DV01 magnitudes below this make per-DV01 ratios undefined.
pub const DV01_EPS: f64 = 1e-12;

/// Modified duration with the default 1bp bump.
pub fn modified_duration(spec: &BondSpec, yield_: f64) -> AnalyticsResult<f64> {
    modified_duration_with_bump(spec, yield_, DEFAULT_DURATION_BUMP)
}

/// Modified duration with an explicit yield bump (decimal).
pub fn modified_duration_with_bump(
    spec: &BondSpec,
    yield_: f64,
    bump: f64,
) -> AnalyticsResult<f64> {
    if !(bump.is_finite() && bump > 0.0) {
        return Err(AnalyticsError::InvalidBump { bump });
    }

    let p = price(spec, yield_)?;
    let p_up = price(spec, yield_ + bump)?;
    let p_dn = price(spec, yield_ - bump)?;

    Ok(-(p_up - p_dn) / (2.0 * bump * p))
}

/// DV01 in price units, with the default bump.
pub fn dv01(spec: &BondSpec, yield_: f64) -> AnalyticsResult<f64> {
    dv01_with_bump(spec, yield_, DEFAULT_DURATION_BUMP)
}

pub fn dv01_with_bump(spec: &BondSpec, yield_: f64, bump: f64) -> AnalyticsResult<f64> {
    Ok(modified_duration_with_bump(spec, yield_, bump)? * spec.face * BASIS_POINT)
}

/// `value / dv01`, or `None` when DV01 is numerically zero.
pub fn per_dv01(value: f64, dv01: f64) -> Option<f64> {
    if dv01.abs() < DV01_EPS || !dv01.is_finite() {
        warn!(value, dv01, "per-DV01 ratio undefined for near-zero DV01");
        return None;
    }
    Some(value / dv01)
}
