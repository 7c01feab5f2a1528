//! Formatted terminal output for an analysis run.
//!
//! We keep formatting code in one place so:
//! - the analytics code stays clean and testable
//! - output changes are localized
//!
//! Returns are fractions of the starting price and are shown in percent.
//! Per-DV01 ratios are shown raw; undefined ratios print as `n/a`.

use crate::app::pipeline::RunOutput;
use crate::curve::YieldCurve;
use crate::domain::{
    AnalysisConfig, BondSpec, EfficiencyRecord, FramingRecord, HorizonRecord, ReturnRecord,
    ScenarioResult,
};

/// Closing commentary printed after the tables.
pub const PM_TAKEAWAY: &str = "\
PM Takeaway
- Front end offers the most efficient carry across all horizons due to low DV01.
- Belly performance improves at longer horizons as roll-down becomes meaningful.
- Long end remains DV01-constrained and is best used for macro duration views.
- Bear steepeners penalize long duration; bull flatteners favor the front end.";

/// Format every section of a run, in presentation order.
pub fn format_report(run: &RunOutput, config: &AnalysisConfig) -> String {
    let mut out = String::new();

    out.push_str(&format_run_summary(run, config));
    out.push('\n');
    out.push_str(&format_curve(&run.curve));
    out.push('\n');

    out.push_str(&format!("Carry & roll-down ({} horizon):\n", config.horizon.label));
    out.push_str(&format_base_table(&run.base));
    out.push('\n');

    out.push_str("Carry efficiency (per DV01):\n");
    out.push_str(&format_efficiency_table(&run.efficiency));
    out.push('\n');

    out.push_str("PM trade framing (ranked by carry + roll per DV01):\n");
    out.push_str(&format_framing_table(&run.framing));
    out.push('\n');

    out.push_str("Scenario decomposition:\n");
    out.push_str(&format_scenario_table(&run.scenarios));
    out.push('\n');

    out.push_str("Scenario total return per DV01:\n");
    out.push_str(&format_scenario_pivot(&run.scenarios));
    out.push('\n');

    out.push_str("Carry + roll per DV01 by horizon:\n");
    out.push_str(&format_horizon_pivot(&run.horizons));
    out.push('\n');

    out.push_str(PM_TAKEAWAY);
    out.push('\n');

    out
}

/// Run header: curve provenance and run parameters.
pub fn format_run_summary(run: &RunOutput, config: &AnalysisConfig) -> String {
    let mut out = String::new();

    out.push_str("=== carry - Treasury Carry & Roll-Down ===\n");
    out.push_str(&format!("As-of: {} ({})\n", run.source.asof_date, run.source.source));
    out.push_str(&format!(
        "Bonds: {} par bonds | freq={} | face={}\n",
        run.bonds.len(),
        config.frequency,
        config.face
    ));
    out.push_str(&format!(
        "Horizon: {} ({:.4}y) | duration bump={:.2}bp\n",
        config.horizon.label,
        config.horizon.years,
        config.bump * 10_000.0
    ));
    let names: Vec<&str> = config.scenarios.iter().map(|s| s.name.as_str()).collect();
    out.push_str(&format!("Scenarios: {}\n", names.join(", ")));

    out
}

pub fn format_curve(curve: &YieldCurve) -> String {
    let mut out = String::new();
    push_row(&mut out, format!("{:>8} {:>10}", "tenor", "yield"));
    push_row(&mut out, format!("{:-<8} {:-<10}", "", ""));
    for p in curve.points() {
        push_row(
            &mut out,
            format!("{:>8} {:>10}", fmt_tenor(p.tenor_years), fmt_pct(p.yield_decimal, 3)),
        );
    }
    out
}

pub fn format_base_table(rows: &[ReturnRecord]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!(
            "{:>8} {:>10} {:>10} {:>10} {:>12}",
            "maturity", "y0", "carry", "rolldown", "carry+roll"
        ),
    );
    push_row(&mut out, format!("{:-<8} {:-<10} {:-<10} {:-<10} {:-<12}", "", "", "", "", ""));
    for r in rows {
        push_row(
            &mut out,
            format!(
                "{:>8} {:>10} {:>10} {:>10} {:>12}",
                fmt_tenor(r.maturity),
                fmt_pct(r.initial_yield, 3),
                fmt_pct(r.carry, 4),
                fmt_pct(r.rolldown, 4),
                fmt_pct(r.carry_plus_roll(), 4),
            ),
        );
    }
    out
}

pub fn format_efficiency_table(rows: &[EfficiencyRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, efficiency_header(""));
    push_row(&mut out, efficiency_rule(0));
    for r in rows {
        push_row(&mut out, efficiency_cells(r, ""));
    }
    out
}

pub fn format_framing_table(rows: &[FramingRecord]) -> String {
    let mut out = String::new();
    push_row(&mut out, efficiency_header(&format!(" {:<10}", "bucket")));
    push_row(&mut out, efficiency_rule(10));
    for r in rows {
        push_row(
            &mut out,
            efficiency_cells(&r.efficiency, &format!(" {:<10}", r.bucket.display_name())),
        );
    }
    out
}

fn efficiency_header(suffix: &str) -> String {
    format!(
        "{:>8} {:>10} {:>10} {:>8} {:>10} {:>12}{suffix}",
        "maturity", "carry", "rolldown", "dv01", "carry/dv01", "c+r/dv01"
    )
}

fn efficiency_rule(suffix_width: usize) -> String {
    let mut line = format!("{:-<8} {:-<10} {:-<10} {:-<8} {:-<10} {:-<12}", "", "", "", "", "", "");
    if suffix_width > 0 {
        line.push(' ');
        line.push_str(&"-".repeat(suffix_width));
    }
    line
}

fn efficiency_cells(r: &EfficiencyRecord, suffix: &str) -> String {
    format!(
        "{:>8} {:>10} {:>10} {:>8.4} {:>10} {:>12}{suffix}",
        fmt_tenor(r.maturity),
        fmt_pct(r.carry, 4),
        fmt_pct(r.rolldown, 4),
        r.dv01,
        fmt_ratio(r.carry_per_dv01),
        fmt_ratio(r.carry_plus_roll_per_dv01),
    )
}

pub fn format_scenario_table(rows: &[ScenarioResult]) -> String {
    let name_width = name_width(rows.iter().map(|r| r.scenario.as_str()), "scenario");

    let mut out = String::new();
    push_row(
        &mut out,
        format!(
            "{:<name_width$} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "scenario", "maturity", "carry", "rolldown", "shift", "total", "dv01", "total/dv01"
        ),
    );
    push_row(
        &mut out,
        format!(
            "{:-<name_width$} {:-<8} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10}",
            "", "", "", "", "", "", "", ""
        ),
    );
    for r in rows {
        let s = &r.record;
        push_row(
            &mut out,
            format!(
                "{:<name_width$} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10.4} {:>10}",
                r.scenario,
                fmt_tenor(s.maturity),
                fmt_pct(s.carry, 4),
                fmt_pct(s.rolldown, 4),
                fmt_pct(s.shift_pnl, 4),
                fmt_pct(s.total_return, 4),
                s.dv01,
                fmt_ratio(s.total_per_dv01),
            ),
        );
    }
    out
}

/// Total return per DV01, one row per maturity and one column per scenario.
pub fn format_scenario_pivot(rows: &[ScenarioResult]) -> String {
    pivot(
        rows.iter()
            .map(|r| (r.record.maturity, r.scenario.as_str(), r.record.total_per_dv01)),
    )
}

/// Carry + roll per DV01, one row per maturity and one column per horizon.
pub fn format_horizon_pivot(rows: &[HorizonRecord]) -> String {
    pivot(
        rows.iter()
            .map(|r| (r.maturity, r.horizon.label.as_str(), r.carry_plus_roll_per_dv01)),
    )
}

/// Price and risk for a single bond at a given yield.
pub fn format_bond_risk(
    spec: &BondSpec,
    yield_: f64,
    price: f64,
    duration: f64,
    dv01: f64,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Bond: {}y {} coupon | freq={} | face={}\n",
        fmt_tenor(spec.maturity_years),
        fmt_pct(spec.coupon, 3),
        spec.frequency,
        spec.face
    ));
    out.push_str(&format!("Yield: {}\n", fmt_pct(yield_, 4)));
    out.push_str(&format!("Price: {price:.6}\n"));
    out.push_str(&format!("Modified duration: {duration:.6}\n"));
    out.push_str(&format!("DV01: {dv01:.6}\n"));
    out
}

/// Lay out `(maturity, column, value)` cells as a grid.
///
/// Rows and columns appear in first-seen order.
fn pivot<'a>(cells: impl Iterator<Item = (f64, &'a str, Option<f64>)>) -> String {
    let mut maturities: Vec<f64> = Vec::new();
    let mut columns: Vec<&str> = Vec::new();
    let mut grid: Vec<(usize, usize, Option<f64>)> = Vec::new();

    for (maturity, column, value) in cells {
        let ri = match maturities.iter().position(|&m| m == maturity) {
            Some(i) => i,
            None => {
                maturities.push(maturity);
                maturities.len() - 1
            }
        };
        let ci = match columns.iter().position(|&c| c == column) {
            Some(i) => i,
            None => {
                columns.push(column);
                columns.len() - 1
            }
        };
        grid.push((ri, ci, value));
    }

    let widths: Vec<usize> = columns.iter().map(|c| c.chars().count().max(10)).collect();

    let mut out = String::new();

    let mut header = format!("{:>8}", "maturity");
    let mut rule = format!("{:-<8}", "");
    for (c, &w) in columns.iter().zip(&widths) {
        header.push_str(&format!(" {c:>w$}"));
        rule.push_str(&format!(" {:-<w$}", ""));
    }
    push_row(&mut out, header);
    push_row(&mut out, rule);

    for (ri, &maturity) in maturities.iter().enumerate() {
        let mut line = format!("{:>8}", fmt_tenor(maturity));
        for (ci, &w) in widths.iter().enumerate() {
            let value = grid
                .iter()
                .find(|&&(r, c, _)| r == ri && c == ci)
                .and_then(|&(_, _, v)| v);
            line.push_str(&format!(" {:>w$}", fmt_ratio(value)));
        }
        push_row(&mut out, line);
    }

    out
}

fn push_row(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>, header: &str) -> usize {
    names
        .map(|n| n.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}

fn fmt_tenor(years: f64) -> String {
    format!("{years}y")
}

fn fmt_pct(v: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", v * 100.0)
}

fn fmt_ratio(v: Option<f64>) -> String {
    match v {
        Some(x) => format!("{x:.4}"),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Horizon, ScenarioRecord};

    fn record(maturity: f64, total_per_dv01: Option<f64>) -> ScenarioRecord {
        ScenarioRecord {
            maturity,
            initial_yield: 0.04,
            dv01: 0.05,
            carry: 0.01,
            rolldown: 0.001,
            shift_pnl: -0.02,
            total_return: -0.009,
            total_per_dv01,
        }
    }

    fn result(scenario: &str, maturity: f64, total_per_dv01: Option<f64>) -> ScenarioResult {
        ScenarioResult {
            scenario: scenario.to_string(),
            record: record(maturity, total_per_dv01),
        }
    }

    #[test]
    fn formatting_helpers() {
        assert_eq!(fmt_tenor(2.0), "2y");
        assert_eq!(fmt_tenor(0.25), "0.25y");
        assert_eq!(fmt_pct(0.0435, 3), "4.350%");
        assert_eq!(fmt_ratio(Some(0.25)), "0.2500");
        assert_eq!(fmt_ratio(None), "n/a");
    }

    #[test]
    fn scenario_pivot_keeps_first_seen_order() {
        let rows = vec![
            result("Base", 2.0, Some(0.5)),
            result("Base", 10.0, Some(0.25)),
            result("Up", 2.0, Some(-1.0)),
            result("Up", 10.0, None),
        ];
        let text = format_scenario_pivot(&rows);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("Base         Up"));
        assert!(lines[2].starts_with("      2y"));
        assert!(lines[2].ends_with("0.5000    -1.0000"));
        assert!(lines[3].ends_with("0.2500        n/a"));
    }

    #[test]
    fn horizon_pivot_has_a_column_per_horizon() {
        let rows: Vec<HorizonRecord> = Horizon::standard_set()
            .into_iter()
            .map(|horizon| HorizonRecord {
                horizon,
                maturity: 5.0,
                carry_plus_roll_per_dv01: Some(0.1),
            })
            .collect();
        let text = format_horizon_pivot(&rows);
        let header = text.lines().next().unwrap();
        for label in ["1M", "3M", "6M", "12M"] {
            assert!(header.contains(label), "{header}");
        }
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn lines_have_no_trailing_whitespace() {
        let rows = vec![ScenarioResult {
            scenario: "Bear Steepener (+50/+150bp)".into(),
            record: record(30.0, None),
        }];
        let text = format_scenario_table(&rows);
        assert!(text.lines().all(|l| l == l.trim_end()));
        assert!(text.contains("Bear Steepener (+50/+150bp)"));
    }

    #[test]
    fn full_report_has_every_section() {
        use crate::app::pipeline::{manual_source, run_with_curve};

        let curve =
            YieldCurve::from_pairs(&[(0.25, 0.043), (2.0, 0.039), (10.0, 0.043), (30.0, 0.0475)])
                .unwrap();
        let config = AnalysisConfig::default();
        let run = run_with_curve(&config, curve, manual_source()).unwrap();
        let text = format_report(&run, &config);

        for section in [
            "=== carry - Treasury Carry & Roll-Down ===",
            "Carry & roll-down (3M horizon):",
            "Carry efficiency (per DV01):",
            "PM trade framing",
            "Scenario decomposition:",
            "Scenario total return per DV01:",
            "Carry + roll per DV01 by horizon:",
            "PM Takeaway",
            "Bull Flattener (-150/-50bp)",
        ] {
            assert!(text.contains(section), "missing {section}");
        }
        assert!(!text.contains("n/a"));
    }

    #[test]
    fn bond_risk_summary() {
        let spec = BondSpec::new(10.0, 0.04).unwrap();
        let text = format_bond_risk(&spec, 0.04, 100.0, 8.175718, 0.08175718);
        assert!(text.contains("Bond: 10y 4.000% coupon"));
        assert!(text.contains("Price: 100.000000"));
        assert!(text.contains("DV01: 0.081757"));
    }
}
