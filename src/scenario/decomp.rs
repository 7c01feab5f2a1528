//! Carry / roll / shift decomposition of horizon total return.
//!
//! Against a base curve `B` and a shocked curve `S`, with `rem` the remaining
//! maturity after the horizon:
//!
//! ```text
//! P0     = P(B(T), T)
//! P_roll = P(B(rem), rem)
//! P1     = P(S(rem), rem)
//! total  = (P1 - P0) / P0 + carry
//! roll   = (P_roll - P0) / P0
//! shift  = total - carry - roll
//! ```
//!
//! `shift` is the residual by construction, so the three components always sum
//! to the total.

use rayon::prelude::*;
use tracing::debug;

use crate::analytics::returns::check_horizon;
use crate::analytics::{carry, dv01_with_bump, per_dv01, remaining_maturity, DEFAULT_DURATION_BUMP};
use crate::curve::YieldCurve;
use crate::domain::{BondSpec, ScenarioRecord, ScenarioResult};
use crate::error::AnalyticsResult;
use crate::pricing::price_at;
use crate::scenario::Scenario;

/// Decompose one bond's horizon return under `shocked`, relative to `base`.
pub fn scenario_decomp(
    spec: &BondSpec,
    base: &YieldCurve,
    shocked: &YieldCurve,
    horizon_years: f64,
) -> AnalyticsResult<ScenarioRecord> {
    scenario_decomp_with_bump(spec, base, shocked, horizon_years, DEFAULT_DURATION_BUMP)
}

pub fn scenario_decomp_with_bump(
    spec: &BondSpec,
    base: &YieldCurve,
    shocked: &YieldCurve,
    horizon_years: f64,
    bump: f64,
) -> AnalyticsResult<ScenarioRecord> {
    check_horizon(horizon_years)?;
    let maturity = spec.maturity_years;
    let remaining = remaining_maturity(spec, horizon_years);

    let y0 = base.interpolate(maturity);
    let p0 = price_at(spec, y0, maturity)?;

    let carry = carry(spec, y0, horizon_years)?;

    let y_roll = base.interpolate(remaining);
    let p_roll = price_at(spec, y_roll, remaining)?;
    let rolldown = (p_roll - p0) / p0;

    let y1 = shocked.interpolate(remaining);
    let p1 = price_at(spec, y1, remaining)?;

    let total_return = (p1 - p0) / p0 + carry;
    let shift_pnl = total_return - carry - rolldown;

    let dv01 = dv01_with_bump(spec, y0, bump)?;

    Ok(ScenarioRecord {
        maturity,
        initial_yield: y0,
        dv01,
        carry,
        rolldown,
        shift_pnl,
        total_return,
        total_per_dv01: per_dv01(total_return, dv01),
    })
}

/// Evaluate every (scenario, bond) pair, ordered by scenario then bond.
///
/// Shocked curves are built once per scenario; the pairs are then evaluated in
/// parallel against the shared, read-only curves.
pub fn run_scenarios(
    bonds: &[BondSpec],
    base: &YieldCurve,
    scenarios: &[Scenario],
    horizon_years: f64,
    bump: f64,
) -> AnalyticsResult<Vec<ScenarioResult>> {
    let shocked: Vec<YieldCurve> = scenarios
        .iter()
        .map(|s| s.apply(base))
        .collect::<AnalyticsResult<_>>()?;

    debug!(
        scenarios = scenarios.len(),
        bonds = bonds.len(),
        horizon_years,
        "evaluating scenario grid"
    );

    let n_bonds = bonds.len();
    (0..scenarios.len() * n_bonds)
        .into_par_iter()
        .map(|idx| -> AnalyticsResult<ScenarioResult> {
            let (si, bi) = (idx / n_bonds, idx % n_bonds);
            let record =
                scenario_decomp_with_bump(&bonds[bi], base, &shocked[si], horizon_years, bump)?;
            Ok(ScenarioResult {
                scenario: scenarios[si].name.clone(),
                record,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::rolldown;
    use crate::scenario::{parallel_shift, twist, CurveShock};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TENORS: [f64; 10] = [0.25, 0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 20.0, 30.0];

    fn random_curve(rng: &mut StdRng) -> YieldCurve {
        let mut y = rng.gen_range(0.0..0.06);
        let pairs: Vec<(f64, f64)> = TENORS
            .iter()
            .map(|&t| {
                y += rng.gen_range(-0.004..0.004);
                (t, y)
            })
            .collect();
        YieldCurve::from_pairs(&pairs).unwrap()
    }

    #[test]
    fn components_sum_to_total() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let base = random_curve(&mut rng);
            let front = rng.gen_range(-200.0..200.0);
            let long = rng.gen_range(-200.0..200.0);
            let shocked = twist(&base, front, long).unwrap();
            let maturity = rng.gen_range(0.5..30.0);
            let spec = BondSpec::at_par(&base, maturity, 2, 100.0).unwrap();
            let horizon = rng.gen_range(0.0..2.0);

            let r = scenario_decomp(&spec, &base, &shocked, horizon).unwrap();
            assert!(
                (r.total_return - (r.carry + r.rolldown + r.shift_pnl)).abs() < 1e-9,
                "{r:?}"
            );
        }
    }

    #[test]
    fn zero_shock_has_no_shift_pnl() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let base = random_curve(&mut rng);
            let spec = BondSpec::at_par(&base, rng.gen_range(1.0..30.0), 2, 100.0).unwrap();
            let r = scenario_decomp(&spec, &base, &base, 0.25).unwrap();
            assert!(r.shift_pnl.abs() < 1e-12, "{r:?}");
            assert_relative_eq!(r.total_return, r.carry + r.rolldown, epsilon = 1e-12);
        }
    }

    #[test]
    fn matches_standalone_carry_and_roll() {
        let base = YieldCurve::from_pairs(&[(2.0, 0.034), (10.0, 0.042), (30.0, 0.047)]).unwrap();
        let spec = BondSpec::at_par(&base, 10.0, 2, 100.0).unwrap();
        let shocked = parallel_shift(&base, 100.0).unwrap();

        let r = scenario_decomp(&spec, &base, &shocked, 0.25).unwrap();
        assert_eq!(r.carry, carry(&spec, 0.042, 0.25).unwrap());
        assert_eq!(r.rolldown, rolldown(&spec, &base, 0.25).unwrap());
        assert!(r.shift_pnl < 0.0, "rates up should lose: {r:?}");
        assert!(r.total_per_dv01.unwrap() < 0.0);
    }

    #[test]
    fn grid_is_ordered_by_scenario_then_bond() {
        let base = YieldCurve::from_pairs(&[(2.0, 0.034), (10.0, 0.042), (30.0, 0.047)]).unwrap();
        let bonds: Vec<BondSpec> = [2.0, 10.0, 30.0]
            .iter()
            .map(|&m| BondSpec::at_par(&base, m, 2, 100.0).unwrap())
            .collect();
        let scenarios = vec![
            Scenario::base(),
            Scenario::unnamed(CurveShock::Parallel { bp: -50.0 }),
        ];

        let rows = run_scenarios(&bonds, &base, &scenarios, 0.25, DEFAULT_DURATION_BUMP).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].scenario, "Base");
        assert_eq!(rows[3].scenario, "Parallel -50bp");
        let maturities: Vec<f64> = rows.iter().map(|r| r.record.maturity).collect();
        assert_eq!(maturities, vec![2.0, 10.0, 30.0, 2.0, 10.0, 30.0]);
        assert!(rows[3..].iter().all(|r| r.record.shift_pnl > 0.0));
    }

    #[test]
    fn degenerate_scenario_curve_is_reported() {
        let base = YieldCurve::from_pairs(&[(10.0, 0.04)]).unwrap();
        let bonds = vec![BondSpec::new(10.0, 0.04).unwrap()];
        let scenarios = Scenario::standard_set();
        assert!(run_scenarios(&bonds, &base, &scenarios, 0.25, DEFAULT_DURATION_BUMP).is_err());
    }
}
