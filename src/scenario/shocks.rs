//! Curve shocks.
//!
//! Shocks are quoted in basis points and applied to every curve point:
//!
//! - parallel: `y'(t) = y(t) + bp / 10_000`
//! - twist:    `w = (t - t_min) / (t_max - t_min)`,
//!             `y'(t) = y(t) + (front + (long - front) * w) / 10_000`
//!
//! The input curve is never modified; each shock returns a new `YieldCurve`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::curve::YieldCurve;
use crate::error::{AnalyticsError, AnalyticsResult};

const BP_PER_UNIT: f64 = 10_000.0;

/// Shift every yield by `bp` basis points.
pub fn parallel_shift(curve: &YieldCurve, bp: f64) -> AnalyticsResult<YieldCurve> {
    check_bp(bp)?;
    let shift = bp / BP_PER_UNIT;
    Ok(curve.map_yields(|p| p.yield_decimal + shift))
}

/// Linear twist: `front_bp` at the shortest tenor, `long_bp` at the longest.
///
/// Requires at least two distinct tenors.
pub fn twist(curve: &YieldCurve, front_bp: f64, long_bp: f64) -> AnalyticsResult<YieldCurve> {
    check_bp(front_bp)?;
    check_bp(long_bp)?;
    if curve.len() < 2 {
        return Err(AnalyticsError::DegenerateTwist { points: curve.len() });
    }

    let t_min = curve.tenor_min();
    let span = curve.tenor_max() - t_min;

    Ok(curve.map_yields(|p| {
        let w = (p.tenor_years - t_min) / span;
        let bp = front_bp + (long_bp - front_bp) * w;
        p.yield_decimal + bp / BP_PER_UNIT
    }))
}

fn check_bp(bp: f64) -> AnalyticsResult<()> {
    if bp.is_finite() {
        Ok(())
    } else {
        Err(AnalyticsError::InvalidShock { bp })
    }
}

/// A curve shock definition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum CurveShock {
    /// Unchanged curve.
    None,
    Parallel { bp: f64 },
    Twist { front_bp: f64, long_bp: f64 },
}

impl CurveShock {
    pub fn apply(&self, curve: &YieldCurve) -> AnalyticsResult<YieldCurve> {
        match *self {
            CurveShock::None => Ok(curve.clone()),
            CurveShock::Parallel { bp } => parallel_shift(curve, bp),
            CurveShock::Twist { front_bp, long_bp } => twist(curve, front_bp, long_bp),
        }
    }
}

impl fmt::Display for CurveShock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveShock::None => write!(f, "Base"),
            CurveShock::Parallel { bp } => write!(f, "Parallel {bp:+}bp"),
            CurveShock::Twist { front_bp, long_bp } => {
                write!(f, "Twist ({front_bp:+}/{long_bp:+}bp)")
            }
        }
    }
}

/// A named shock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub shock: CurveShock,
}

impl Scenario {
    pub fn new(name: impl Into<String>, shock: CurveShock) -> Self {
        Self {
            name: name.into(),
            shock,
        }
    }

    /// Scenario named after its shock.
    pub fn unnamed(shock: CurveShock) -> Self {
        Self::new(shock.to_string(), shock)
    }

    pub fn base() -> Self {
        Self::unnamed(CurveShock::None)
    }

    /// Base, +100bp parallel, bear steepener and bull flattener.
    pub fn standard_set() -> Vec<Scenario> {
        vec![
            Scenario::base(),
            Scenario::unnamed(CurveShock::Parallel { bp: 100.0 }),
            Scenario::new(
                "Bear Steepener (+50/+150bp)",
                CurveShock::Twist {
                    front_bp: 50.0,
                    long_bp: 150.0,
                },
            ),
            Scenario::new(
                "Bull Flattener (-150/-50bp)",
                CurveShock::Twist {
                    front_bp: -150.0,
                    long_bp: -50.0,
                },
            ),
        ]
    }

    pub fn apply(&self, curve: &YieldCurve) -> AnalyticsResult<YieldCurve> {
        self.shock.apply(curve)
    }
}

/// Parse `[NAME=]base`, `[NAME=]parallel:<bp>` or `[NAME=]twist:<front_bp>:<long_bp>`.
impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, body) = match s.split_once('=') {
            Some((name, body)) if !name.trim().is_empty() => (Some(name.trim()), body),
            Some(_) => return Err(format!("Empty scenario name in '{s}'.")),
            None => (None, s),
        };

        let parts: Vec<&str> = body.trim().split(':').map(str::trim).collect();
        let bp = |raw: &str| -> Result<f64, String> {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("Invalid basis-point value '{raw}' in scenario '{s}'."))
        };

        let shock = match parts.as_slice() {
            [kind] if kind.eq_ignore_ascii_case("base") => CurveShock::None,
            [kind, v] if kind.eq_ignore_ascii_case("parallel") => {
                CurveShock::Parallel { bp: bp(*v)? }
            }
            [kind, front, long] if kind.eq_ignore_ascii_case("twist") => CurveShock::Twist {
                front_bp: bp(*front)?,
                long_bp: bp(*long)?,
            },
            _ => {
                return Err(format!(
                    "Invalid scenario '{s}' \
                     (expected base, parallel:<bp> or twist:<front_bp>:<long_bp>)."
                ));
            }
        };

        Ok(match name {
            Some(name) => Scenario::new(name, shock),
            None => Scenario::unnamed(shock),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parallel_shift_flat_three_to_four() {
        let tenors = [0.25, 2.0, 5.0, 10.0, 30.0];
        let curve = YieldCurve::flat(&tenors, 0.03).unwrap();
        let shocked = parallel_shift(&curve, 100.0).unwrap();
        for p in shocked.points() {
            assert_eq!(p.yield_decimal, 0.04);
        }
        // Base curve is untouched.
        assert!(curve.points().iter().all(|p| p.yield_decimal == 0.03));
    }

    #[test]
    fn twist_endpoints_and_midpoint() {
        let curve = YieldCurve::from_pairs(&[(2.0, 0.03), (16.0, 0.04), (30.0, 0.05)]).unwrap();
        let shocked = twist(&curve, 50.0, 150.0).unwrap();
        let pts = shocked.points();

        assert_relative_eq!(pts[0].yield_decimal, 0.03 + 0.0050, epsilon = 1e-15);
        // 16y sits at weight 0.5 between 2y and 30y.
        assert_relative_eq!(pts[1].yield_decimal, 0.04 + 0.0100, epsilon = 1e-15);
        assert_relative_eq!(pts[2].yield_decimal, 0.05 + 0.0150, epsilon = 1e-15);
    }

    #[test]
    fn twist_requires_two_tenors() {
        let curve = YieldCurve::from_pairs(&[(5.0, 0.04)]).unwrap();
        assert_eq!(
            twist(&curve, 10.0, 20.0),
            Err(AnalyticsError::DegenerateTwist { points: 1 })
        );
        // A parallel shift is still fine on one point.
        assert!(parallel_shift(&curve, 10.0).is_ok());
    }

    #[test]
    fn rejects_non_finite_shocks() {
        let curve = YieldCurve::flat(&[1.0, 2.0], 0.03).unwrap();
        assert!(parallel_shift(&curve, f64::NAN).is_err());
        assert!(twist(&curve, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn standard_set_names() {
        let names: Vec<String> = Scenario::standard_set().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "Base",
                "Parallel +100bp",
                "Bear Steepener (+50/+150bp)",
                "Bull Flattener (-150/-50bp)"
            ]
        );
    }

    #[test]
    fn parses_scenario_specs() {
        assert_eq!("base".parse::<Scenario>().unwrap(), Scenario::base());
        assert_eq!(
            "parallel:-25".parse::<Scenario>().unwrap(),
            Scenario::new("Parallel -25bp", CurveShock::Parallel { bp: -25.0 })
        );
        assert_eq!(
            "Steep=twist:+10:+40".parse::<Scenario>().unwrap(),
            Scenario::new(
                "Steep",
                CurveShock::Twist {
                    front_bp: 10.0,
                    long_bp: 40.0
                }
            )
        );
        assert!("parallel".parse::<Scenario>().is_err());
        assert!("twist:1".parse::<Scenario>().is_err());
        assert!("parallel:abc".parse::<Scenario>().is_err());
        assert!("=base".parse::<Scenario>().is_err());
    }
}
