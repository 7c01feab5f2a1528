//! Carry and roll-down over a holding horizon.
//!
//! - carry: coupon income over the horizon as a fraction of the initial price
//!   (no compounding, no reinvestment)
//! - roll-down: price change from ageing along an unchanged curve, repricing the
//!   shorter bond at the curve yield for its remaining maturity

use std::cmp::Ordering;

use crate::analytics::risk::{dv01_with_bump, per_dv01, DEFAULT_DURATION_BUMP};
use crate::curve::YieldCurve;
use crate::domain::{
    BondSpec, CurveBucket, EfficiencyRecord, FramingRecord, Horizon, HorizonRecord, ReturnRecord,
};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::pricing::{price, price_at};

/// Floor on remaining maturity after the horizon (years).
pub const MIN_REMAINING_YEARS: f64 = 0.0001;

/// Remaining maturity after `horizon_years`, floored at [`MIN_REMAINING_YEARS`].
pub fn remaining_maturity(spec: &BondSpec, horizon_years: f64) -> f64 {
    (spec.maturity_years - horizon_years).max(MIN_REMAINING_YEARS)
}

pub(crate) fn check_horizon(horizon_years: f64) -> AnalyticsResult<()> {
    if horizon_years.is_finite() && horizon_years >= 0.0 {
        Ok(())
    } else {
        Err(AnalyticsError::InvalidHorizon {
            horizon: horizon_years,
        })
    }
}

/// Coupon income over the horizon divided by the price at `y0`.
pub fn carry(spec: &BondSpec, y0: f64, horizon_years: f64) -> AnalyticsResult<f64> {
    check_horizon(horizon_years)?;
    let p0 = price(spec, y0)?;
    Ok(spec.coupon * spec.face * horizon_years / p0)
}

/// Return from rolling down a static curve over the horizon.
pub fn rolldown(spec: &BondSpec, curve: &YieldCurve, horizon_years: f64) -> AnalyticsResult<f64> {
    check_horizon(horizon_years)?;
    let remaining = remaining_maturity(spec, horizon_years);

    let y0 = curve.interpolate(spec.maturity_years);
    let y_roll = curve.interpolate(remaining);

    let p0 = price_at(spec, y0, spec.maturity_years)?;
    let p_roll = price_at(spec, y_roll, remaining)?;

    Ok((p_roll - p0) / p0)
}

/// Initial yield, carry and roll-down for one bond.
pub fn total_expected_return(
    spec: &BondSpec,
    curve: &YieldCurve,
    horizon_years: f64,
) -> AnalyticsResult<ReturnRecord> {
    let y0 = curve.interpolate(spec.maturity_years);
    Ok(ReturnRecord {
        maturity: spec.maturity_years,
        initial_yield: y0,
        carry: carry(spec, y0, horizon_years)?,
        rolldown: rolldown(spec, curve, horizon_years)?,
    })
}

/// Carry and carry + roll per unit of DV01, with the default duration bump.
pub fn carry_efficiency(
    spec: &BondSpec,
    curve: &YieldCurve,
    horizon_years: f64,
) -> AnalyticsResult<EfficiencyRecord> {
    carry_efficiency_with_bump(spec, curve, horizon_years, DEFAULT_DURATION_BUMP)
}

pub fn carry_efficiency_with_bump(
    spec: &BondSpec,
    curve: &YieldCurve,
    horizon_years: f64,
    bump: f64,
) -> AnalyticsResult<EfficiencyRecord> {
    let base = total_expected_return(spec, curve, horizon_years)?;
    let dv = dv01_with_bump(spec, base.initial_yield, bump)?;

    Ok(EfficiencyRecord {
        maturity: base.maturity,
        carry: base.carry,
        rolldown: base.rolldown,
        dv01: dv,
        carry_per_dv01: per_dv01(base.carry, dv),
        carry_plus_roll_per_dv01: per_dv01(base.carry_plus_roll(), dv),
    })
}

/// Carry + roll per DV01 for one bond across several horizons.
pub fn horizon_sensitivity(
    spec: &BondSpec,
    curve: &YieldCurve,
    horizons: &[Horizon],
    bump: f64,
) -> AnalyticsResult<Vec<HorizonRecord>> {
    // DV01 depends only on the initial yield, not on the horizon.
    let y0 = curve.interpolate(spec.maturity_years);
    let dv = dv01_with_bump(spec, y0, bump)?;

    horizons
        .iter()
        .map(|h| {
            let r = total_expected_return(spec, curve, h.years)?;
            Ok(HorizonRecord {
                horizon: h.clone(),
                maturity: spec.maturity_years,
                carry_plus_roll_per_dv01: per_dv01(r.carry_plus_roll(), dv),
            })
        })
        .collect()
}

/// Bucket each record and rank by carry + roll per DV01 (best first).
///
/// Undefined ratios sort last; ties keep input order.
pub fn frame_by_bucket(records: &[EfficiencyRecord]) -> Vec<FramingRecord> {
    let mut out: Vec<FramingRecord> = records
        .iter()
        .map(|r| FramingRecord {
            bucket: CurveBucket::for_maturity(r.maturity),
            efficiency: *r,
        })
        .collect();

    out.sort_by(|a, b| {
        match (
            a.efficiency.carry_plus_roll_per_dv01,
            b.efficiency.carry_plus_roll_per_dv01,
        ) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TENORS: [f64; 10] = [0.25, 0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 20.0, 30.0];

    fn upward_curve() -> YieldCurve {
        YieldCurve::from_pairs(&[
            (0.25, 0.030),
            (2.0, 0.034),
            (5.0, 0.038),
            (10.0, 0.042),
            (30.0, 0.047),
        ])
        .unwrap()
    }

    #[test]
    fn ten_year_on_flat_four_percent() {
        let curve = YieldCurve::flat(&TENORS, 0.04).unwrap();
        let spec = BondSpec::new(10.0, 0.04).unwrap();

        assert_relative_eq!(price(&spec, 0.04).unwrap(), 100.0, epsilon = 1e-10);
        assert_relative_eq!(carry(&spec, 0.04, 0.25).unwrap(), 0.01, epsilon = 1e-12);
        assert!(rolldown(&spec, &curve, 0.25).unwrap().abs() < 1e-12);
    }

    #[test]
    fn positive_roll_on_upward_sloping_curve() {
        let curve = upward_curve();
        for &m in &[2.0, 5.0, 10.0, 30.0] {
            let spec = BondSpec::at_par(&curve, m, 2, 100.0).unwrap();
            let roll = rolldown(&spec, &curve, 0.25).unwrap();
            assert!(roll > 0.0, "{m}y roll was {roll}");
        }
    }

    #[test]
    fn rolldown_floors_remaining_maturity() {
        let spec = BondSpec::new(0.25, 0.03).unwrap();
        assert_eq!(remaining_maturity(&spec, 1.0), MIN_REMAINING_YEARS);
        let curve = upward_curve();
        let roll = rolldown(&spec, &curve, 1.0).unwrap();
        assert!(roll.is_finite());
    }

    #[test]
    fn rejects_negative_horizon() {
        let spec = BondSpec::new(5.0, 0.03).unwrap();
        assert!(matches!(
            carry(&spec, 0.03, -0.25),
            Err(AnalyticsError::InvalidHorizon { .. })
        ));
    }

    #[test]
    fn total_expected_return_bundles_components() {
        let curve = upward_curve();
        let spec = BondSpec::at_par(&curve, 5.0, 2, 100.0).unwrap();
        let r = total_expected_return(&spec, &curve, 0.25).unwrap();
        assert_eq!(r.maturity, 5.0);
        assert_eq!(r.initial_yield, 0.038);
        assert_eq!(r.carry, carry(&spec, 0.038, 0.25).unwrap());
        assert_eq!(r.rolldown, rolldown(&spec, &curve, 0.25).unwrap());
        assert_eq!(r.carry_plus_roll(), r.carry + r.rolldown);
    }

    #[test]
    fn efficiency_scales_by_dv01() {
        let curve = upward_curve();
        let spec = BondSpec::at_par(&curve, 10.0, 2, 100.0).unwrap();
        let e = carry_efficiency(&spec, &curve, 0.25).unwrap();
        assert!(e.dv01 > 0.0);
        assert_relative_eq!(e.carry_per_dv01.unwrap(), e.carry / e.dv01, max_relative = 1e-12);
        assert_relative_eq!(
            e.carry_plus_roll_per_dv01.unwrap(),
            (e.carry + e.rolldown) / e.dv01,
            max_relative = 1e-12
        );
    }

    #[test]
    fn front_end_ranks_first_on_per_dv01() {
        let curve = upward_curve();
        let records: Vec<EfficiencyRecord> = [30.0, 10.0, 2.0]
            .iter()
            .map(|&m| {
                let spec = BondSpec::at_par(&curve, m, 2, 100.0).unwrap();
                carry_efficiency(&spec, &curve, 0.25).unwrap()
            })
            .collect();

        let framed = frame_by_bucket(&records);
        assert_eq!(framed[0].bucket, CurveBucket::FrontEnd);
        assert_eq!(framed[0].efficiency.maturity, 2.0);
        assert_eq!(framed[2].bucket, CurveBucket::LongEnd);
    }

    #[test]
    fn undefined_ratios_rank_last() {
        let defined = EfficiencyRecord {
            maturity: 5.0,
            carry: 0.01,
            rolldown: 0.0,
            dv01: 0.04,
            carry_per_dv01: Some(0.25),
            carry_plus_roll_per_dv01: Some(0.25),
        };
        let undefined = EfficiencyRecord {
            maturity: 0.2,
            dv01: 0.0,
            carry_per_dv01: None,
            carry_plus_roll_per_dv01: None,
            ..defined
        };
        let framed = frame_by_bucket(&[undefined, defined]);
        assert_eq!(framed[0].efficiency.maturity, 5.0);
        assert_eq!(framed[1].efficiency.carry_plus_roll_per_dv01, None);
    }

    #[test]
    fn horizon_sensitivity_covers_each_horizon() {
        let curve = upward_curve();
        let spec = BondSpec::at_par(&curve, 5.0, 2, 100.0).unwrap();
        let horizons = Horizon::standard_set();
        let rows = horizon_sensitivity(&spec, &curve, &horizons, DEFAULT_DURATION_BUMP).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].horizon.label, "3M");

        // Longer horizons accrue more carry + roll per unit of risk.
        let values: Vec<f64> = rows.iter().map(|r| r.carry_plus_roll_per_dv01.unwrap()).collect();
        assert!(values.windows(2).all(|w| w[1] > w[0]), "{values:?}");

        let e = carry_efficiency(&spec, &curve, 0.25).unwrap();
        assert_relative_eq!(
            rows[1].carry_plus_roll_per_dv01.unwrap(),
            e.carry_plus_roll_per_dv01.unwrap(),
            max_relative = 1e-12
        );
    }
}
