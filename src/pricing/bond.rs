//! Annuity-plus-balloon bond pricing.
//!
//! With `n` remaining coupon periods, per-period coupon `C = coupon * F / f`,
//! per-period rate `r = y / f` and discount factor `d = 1 / (1 + r)`:
//!
//! ```text
//! PV = C * d * (1 - d^n) / (1 - d) + F * d^n  =  C * (1 - d^n) / r + F * d^n
//! ```
//!
//! Coupons are paid at the end of each period, so a bond whose coupon equals its
//! yield prices at face. `n = round(T * f)`; when `n <= 0` the bond is treated as
//! redeemed and priced at face.

use crate::domain::BondSpec;
use crate::error::{AnalyticsError, AnalyticsResult};

/// Below this per-period rate the annuity factor uses its `r -> 0` limit (`n`).
const ZERO_RATE_EPS: f64 = 1e-12;

/// Price `spec` at yield `yield_` with its full maturity remaining.
pub fn price(spec: &BondSpec, yield_: f64) -> AnalyticsResult<f64> {
    price_at(spec, yield_, spec.maturity_years)
}

/// Price `spec` at yield `yield_` with `maturity_years` remaining.
pub fn price_at(spec: &BondSpec, yield_: f64, maturity_years: f64) -> AnalyticsResult<f64> {
    spec.validate()?;

    let freq = f64::from(spec.frequency);
    let r = yield_ / freq;
    if !(yield_.is_finite() && 1.0 + r > 0.0) {
        return Err(AnalyticsError::InvalidYieldForPricing {
            yield_,
            frequency: spec.frequency,
        });
    }

    let n = coupon_periods(maturity_years, spec.frequency);
    if n <= 0 {
        return Ok(spec.face);
    }
    let n = n as f64;

    let c = spec.coupon * spec.face / freq;
    let d_n = (1.0 + r).powf(-n);

    let annuity = if r.abs() < ZERO_RATE_EPS {
        n
    } else {
        (1.0 - d_n) / r
    };

    Ok(c * annuity + spec.face * d_n)
}

/// Number of remaining coupon periods, rounded to the nearest integer.
pub fn coupon_periods(maturity_years: f64, frequency: u32) -> i64 {
    (maturity_years * f64::from(frequency)).round() as i64
}
