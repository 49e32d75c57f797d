//! Formatted terminal output for every `tsstat` subcommand.
//!
//! We keep formatting code in one place so:
//! - the statistics code stays free of presentation concerns
//! - output changes are localized

use crate::app::pipeline::{AcfRun, AdfRun, InputSummary, LjungBoxRun};
use crate::domain::{LjungBoxResult, RegressionResult, Trend};

/// Number of ACF lags listed in the lag table.
pub const ACF_TABLE_ROWS: usize = 20;

/// Dataset block shared by every report.
pub fn format_input(input: &InputSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Input: {}", input.path));
    if input.log_transform {
        out.push_str(" (log)");
    }
    out.push('\n');
    out.push_str(&format!(
        "Values: n={} | segments={} | mean={:.6} | sd={:.6}\n",
        input.values, input.segments, input.mean, input.std_dev
    ));
    if input.skipped_rows > 0 {
        out.push_str(&format!("Skipped rows: {}\n", input.skipped_rows));
    }
    out
}

pub fn format_adf(run: &AdfRun) -> String {
    let res = &run.result;
    let mut out = String::new();

    out.push_str("=== tsstat - Augmented Dickey-Fuller ===\n");
    out.push_str(&format_input(&run.input));
    out.push_str(&format!(
        "Regression: trend={} | lag={} ({}) | n_obs={}\n",
        res.trend, res.used_lag, res.method, res.n_obs
    ));

    out.push_str("\nTest statistic:\n");
    out.push_str(&format!("- gamma : {:.6}\n", res.gamma));
    out.push_str(&format!("- t     : {:.4}\n", res.t_stat));
    out.push_str(&format!("- p(t)  : {}\n", fmt_p(res.p_value)));
    out.push_str(&format!("- AIC={:.3} BIC={:.3}\n", res.aic, res.bic));

    let (trend, mu, tau) = res.estimate();
    match trend {
        Trend::None => {}
        Trend::Constant => out.push_str(&format!("- const : {mu:.6}\n")),
        Trend::ConstantTrend => {
            out.push_str(&format!("- const : {mu:.6}\n"));
            out.push_str(&format!("- trend : {tau:.6}\n"));
        }
    }

    out.push_str(&format!("\nCritical values ({} tail):\n", res.tail));
    for (level, cv) in res.criticals.iter() {
        let verdict = match res.rejects_at(level) {
            Ok(true) => "reject unit root",
            Ok(false) => "keep unit root",
            Err(_) => "?",
        };
        out.push_str(&format!("  {level:>4} {cv:>7.2}  {verdict}\n"));
    }

    if let Some(lb) = &run.residual_check {
        out.push_str("\nResidual diagnostics:\n");
        out.push_str(&format!("- Ljung-Box {}\n", fmt_ljung_box(lb)));
    }
    if let Some(p) = run.residual_ar_order {
        out.push_str(&format!("- AR order (AIC): {p}\n"));
    }

    out
}

pub fn format_acf(run: &AcfRun) -> String {
    let mut out = String::new();

    out.push_str("=== tsstat - Autocorrelation ===\n");
    out.push_str(&format_input(&run.input));
    out.push_str(&format!(
        "Method: {} | lags={} | pooled variance={:.6}\n",
        run.method,
        run.acf.len(),
        run.variance
    ));

    out.push('\n');
    out.push_str(&format!("{:>6} {:>12}\n", "lag", "acf"));
    out.push_str(&format!("{:->6} {:->12}\n", "", ""));
    for (k, v) in run.acf.iter().enumerate().take(ACF_TABLE_ROWS) {
        out.push_str(&format!("{k:>6} {:>12}\n", fmt_num(*v, 6)));
    }
    if run.acf.len() > ACF_TABLE_ROWS {
        out.push_str(&format!("{:>6}\n", "..."));
    }

    let (start, end) = run.fit_window;
    out.push_str(&format!("\nPower-law decay over lags [{start}, {end}):\n"));
    match &run.power_law {
        Some(fit) => {
            out.push_str(&format!(
                "- gamma={:.4} | ln A={:.4} | R2={}\n",
                fit.gamma,
                fit.intercept,
                fmt_num(fit.r_squared, 4)
            ));
            out.push_str(&format_regression(&fit.model, &["ln A", "ln k"]));
        }
        None => out.push_str("- not enough positive lags to fit\n"),
    }

    out
}

pub fn format_ljung_box(run: &LjungBoxRun) -> String {
    let mut out = String::new();
    out.push_str("=== tsstat - Ljung-Box ===\n");
    out.push_str(&format_input(&run.input));
    out.push_str(&format!("Lags: {} | alpha: {}\n", run.lags, run.alpha));
    out.push_str(&format!("\n{}\n", fmt_ljung_box(&run.result)));
    out
}

/// Coefficient table of a regression fit. `names` label the coefficients in
/// order; missing names fall back to `b<i>`.
pub fn format_regression(fit: &RegressionResult, names: &[&str]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<10} {:>12} {:>12} {:>10} {:>10}\n",
            "term", "coef", "std err", "t", "p"
        )
        .trim_end(),
    );
    out.push('\n');

    for i in 0..fit.k() {
        let name = names
            .get(i)
            .map(|s| (*s).to_string())
            .unwrap_or_else(|| format!("b{i}"));
        out.push_str(&format!(
            "{:<10} {:>12} {:>12} {:>10} {:>10}\n",
            truncate(&name, 10),
            fmt_num(fit.coeffs[i], 6),
            fmt_num(fit.std_errors[i], 6),
            fmt_num(fit.t_stats[i], 3),
            fmt_p(fit.p_values[i]),
        ));
    }

    out.push_str(&format!(
        "n={} | sigma2={} | R2={} | adj R2={} | AIC={} | BIC={}\n",
        fit.n(),
        fmt_num(fit.sigma2, 6),
        fmt_num(fit.r_squared, 4),
        fmt_num(fit.adj_r_squared, 4),
        fmt_num(fit.aic, 3),
        fmt_num(fit.bic, 3),
    ));
    out
}

fn fmt_ljung_box(lb: &LjungBoxResult) -> String {
    let verdict = if lb.reject { "reject white noise" } else { "consistent with white noise" };
    format!("Q={:.4} p={} -> {verdict}", lb.q, fmt_p(lb.p_value))
}

fn fmt_num(v: f64, decimals: usize) -> String {
    if v.is_nan() {
        "-".to_string()
    } else {
        format!("{v:.decimals$}")
    }
}

fn fmt_p(p: f64) -> String {
    if p.is_nan() {
        "-".to_string()
    } else if p < 1e-4 {
        "<1e-4".to_string()
    } else {
        format!("{p:.4}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
