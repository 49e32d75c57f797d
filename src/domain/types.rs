//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - returned by value from every fit call (results are immutable snapshots)
//! - exported to JSON by the `tsstat` binary
//! - parsed from command-line tags (`FromStr` + clap `ValueEnum`)

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Deterministic terms included in the ADF regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Trend {
    /// No deterministic term.
    #[serde(rename = "n")]
    #[value(name = "n")]
    None,
    /// Constant.
    #[serde(rename = "c")]
    #[value(name = "c")]
    Constant,
    /// Constant plus linear trend `t = 1..T`.
    #[serde(rename = "ct")]
    #[value(name = "ct")]
    ConstantTrend,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::None => "n",
            Trend::Constant => "c",
            Trend::ConstantTrend => "ct",
        }
    }

    /// Number of deterministic columns added to the design.
    pub fn deterministic_columns(self) -> usize {
        match self {
            Trend::None => 0,
            Trend::Constant => 1,
            Trend::ConstantTrend => 2,
        }
    }
}

/// Lag-selection criterion for the ADF driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum LagMode {
    #[serde(rename = "AIC")]
    #[value(name = "aic", alias = "AIC")]
    Aic,
    #[serde(rename = "BIC")]
    #[value(name = "bic", alias = "BIC")]
    Bic,
    /// Keep the candidate with the smallest t-statistic.
    #[serde(rename = "t-stat")]
    #[value(name = "t-stat")]
    TStat,
}

impl LagMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LagMode::Aic => "AIC",
            LagMode::Bic => "BIC",
            LagMode::TStat => "t-stat",
        }
    }
}

/// Which tail of the ADF distribution is tested.
///
/// `Left` is the classical unit-root test (H1: stationary); `Right` tests for
/// explosive behaviour (H1: bubble).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tail {
    Left,
    Right,
}

impl Tail {
    pub fn as_str(self) -> &'static str {
        match self {
            Tail::Left => "left",
            Tail::Right => "right",
        }
    }
}

/// Output-length convention for [`crate::math::correlate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CorrelateMode {
    Full,
    Valid,
    Same,
}

impl CorrelateMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CorrelateMode::Full => "full",
            CorrelateMode::Valid => "valid",
            CorrelateMode::Same => "same",
        }
    }
}

/// Residual resampling scheme for [`crate::adf::simulate_white_noise`].
///
/// Only `Nonparametric` is implemented; the others are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapMethod {
    Parametric,
    Nonparametric,
    Wild,
}

impl BootstrapMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            BootstrapMethod::Parametric => "parametric",
            BootstrapMethod::Nonparametric => "nonparametric",
            BootstrapMethod::Wild => "wild",
        }
    }
}

/// Which multi-segment ACF implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AcfMethod {
    Direct,
    Parallel,
    Fft,
}

impl AcfMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            AcfMethod::Direct => "direct",
            AcfMethod::Parallel => "parallel",
            AcfMethod::Fft => "fft",
        }
    }
}

macro_rules! tag_impls {
    ($ty:ty, $what:literal, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = StatsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| StatsError::invalid(format!("unknown {} tag '{s}'", $what)))
            }
        }
    };
}

tag_impls!(Trend, "trend", [Trend::None, Trend::Constant, Trend::ConstantTrend]);
tag_impls!(LagMode, "lag mode", [LagMode::Aic, LagMode::Bic, LagMode::TStat]);
tag_impls!(Tail, "tail", [Tail::Left, Tail::Right]);
tag_impls!(
    CorrelateMode,
    "correlate mode",
    [CorrelateMode::Full, CorrelateMode::Valid, CorrelateMode::Same]
);
tag_impls!(
    BootstrapMethod,
    "bootstrap method",
    [BootstrapMethod::Parametric, BootstrapMethod::Nonparametric, BootstrapMethod::Wild]
);
tag_impls!(AcfMethod, "acf method", [AcfMethod::Direct, AcfMethod::Parallel, AcfMethod::Fft]);

/// Full inferential summary of a linear (or L1-penalised) regression.
///
/// For LASSO fits `std_errors`, `t_stats` and `p_values` have no classical
/// meaning and are reported as `NaN`. For logistic LASSO `r_squared` holds the
/// McFadden pseudo-R².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub coeffs: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub t_stats: Vec<f64>,
    /// Two-sided Student-t p-values.
    pub p_values: Vec<f64>,
    pub resids: Vec<f64>,
    /// Residual variance `RSS / (n - k)`.
    pub sigma2: f64,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub aic: f64,
    pub bic: f64,
}

impl RegressionResult {
    /// Number of estimated coefficients.
    pub fn k(&self) -> usize {
        self.coeffs.len()
    }

    /// Number of observations used in the fit.
    pub fn n(&self) -> usize {
        self.resids.len()
    }

    pub fn rss(&self) -> f64 {
        self.resids.iter().map(|r| r * r).sum()
    }
}

/// Tabulated ADF critical values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalValues {
    #[serde(rename = "1%")]
    pub one_pct: f64,
    #[serde(rename = "5%")]
    pub five_pct: f64,
    #[serde(rename = "10%")]
    pub ten_pct: f64,
}

impl CriticalValues {
    /// Hard-coded asymptotic critical values per trend and tail.
    pub fn lookup(trend: Trend, tail: Tail) -> Self {
        let (one_pct, five_pct, ten_pct) = match trend {
            Trend::None => (2.58, 1.95, 1.62),
            Trend::Constant => (3.43, 2.86, 2.57),
            Trend::ConstantTrend => (3.96, 3.41, 3.13),
        };
        let sign = match tail {
            Tail::Left => -1.0,
            Tail::Right => 1.0,
        };
        Self {
            one_pct: sign * one_pct,
            five_pct: sign * five_pct,
            ten_pct: sign * ten_pct,
        }
    }

    /// Look up by significance label: `"1%"`, `"5%"` or `"10%"`.
    pub fn get(&self, level: &str) -> Option<f64> {
        match level.trim() {
            "1%" => Some(self.one_pct),
            "5%" => Some(self.five_pct),
            "10%" => Some(self.ten_pct),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [("1%", self.one_pct), ("5%", self.five_pct), ("10%", self.ten_pct)].into_iter()
    }
}

/// Outcome of an Augmented Dickey–Fuller test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfResult {
    /// Coefficient of the lagged level `y_{t-1}`.
    pub gamma: f64,
    /// ADF statistic: the t-statistic of `gamma`.
    pub t_stat: f64,
    /// Student-t p-value of `gamma` from the selected regression.
    pub p_value: f64,
    pub used_lag: usize,
    /// Effective sample size of the selected regression.
    pub n_obs: usize,
    pub aic: f64,
    pub bic: f64,
    pub method: LagMode,
    pub trend: Trend,
    pub criticals: CriticalValues,
    pub tail: Tail,
    pub resids: Vec<f64>,
    pub coeffs: Vec<f64>,
}

/// Power-law fit of ACF decay, `ACF(k) ~ k^{-gamma}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogAcfFit {
    pub gamma: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// First and one-past-last lag used in the log-log regression.
    pub lag_range: (usize, usize),
    pub model: RegressionResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LjungBoxResult {
    /// `true` when the white-noise null is rejected at the requested level.
    pub reject: bool,
    pub q: f64,
    pub p_value: f64,
}

/// One candidate from [`crate::adf::detect_ar`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArFit {
    pub p: usize,
    pub coeffs: Vec<f64>,
    pub aic: f64,
    pub bic: f64,
    /// `None` for the AR(0) baseline, which is not an OLS fit.
    pub p_values: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub from: f64,
    pub to: f64,
    pub count: usize,
}

/// Slope/intercept of a two-variable least-squares line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Iteration controls shared by both LASSO solvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LassoOptions {
    /// Stop when the largest coordinate change falls below this value.
    pub tol: f64,
    pub max_iter: usize,
    /// Step halvings tried per ISTA iteration before accepting the proposal.
    pub max_backtracks: usize,
}

impl Default for LassoOptions {
    fn default() -> Self {
        Self {
            tol: 1e-5,
            max_iter: 10_000,
            max_backtracks: 10,
        }
    }
}

/// Input options shared by every `tsstat` subcommand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub input: PathBuf,
    /// Apply `ln` to every value after loading (prices -> log-prices).
    pub log_transform: bool,
    pub export: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfConfig {
    pub series: SeriesConfig,
    pub trend: Trend,
    pub max_lag: usize,
    pub lag_mode: LagMode,
    pub tail: Tail,
    /// Ljung–Box lags applied to the selected regression's residuals (0 = skip).
    pub resid_lags: usize,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcfConfig {
    pub series: SeriesConfig,
    pub max_lag: usize,
    pub method: AcfMethod,
    pub min_points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LjungBoxConfig {
    pub series: SeriesConfig,
    pub lags: usize,
    pub alpha: f64,
}

/// Synthetic process generated by `tsstat simulate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessKind {
    WhiteNoise,
    Ar1,
    RandomWalk,
}

impl ProcessKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessKind::WhiteNoise => "white-noise",
            ProcessKind::Ar1 => "ar1",
            ProcessKind::RandomWalk => "random-walk",
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulateConfig {
    pub kind: ProcessKind,
    /// Samples per segment.
    pub len: usize,
    pub segments: usize,
    /// AR coefficient (ignored for white noise and random walks).
    pub phi: f64,
    pub sigma: f64,
    pub seed: u64,
    /// CSV destination; `None` prints to stdout.
    pub output: Option<PathBuf>,
}

/// Run parameters of one `tsstat` invocation, echoed in JSON exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum AnalysisConfig {
    Adf(AdfConfig),
    Acf(AcfConfig),
    LjungBox(LjungBoxConfig),
    Simulate(SimulateConfig),
}

impl AnalysisConfig {
    pub fn command(&self) -> &'static str {
        match self {
            AnalysisConfig::Adf(_) => "adf",
            AnalysisConfig::Acf(_) => "acf",
            AnalysisConfig::LjungBox(_) => "ljung-box",
            AnalysisConfig::Simulate(_) => "simulate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_from_str() {
        assert_eq!("ct".parse::<Trend>().unwrap(), Trend::ConstantTrend);
        assert_eq!("t-stat".parse::<LagMode>().unwrap(), LagMode::TStat);
        assert_eq!("aic".parse::<LagMode>().unwrap(), LagMode::Aic);
        assert_eq!("RIGHT".parse::<Tail>().unwrap(), Tail::Right);
        assert_eq!("same".parse::<CorrelateMode>().unwrap(), CorrelateMode::Same);
    }

    #[test]
    fn unknown_tag_is_invalid_value() {
        let err = "nc".parse::<Trend>().unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::InvalidValue);
    }

    #[test]
    fn critical_values_mirror_by_tail() {
        let left = CriticalValues::lookup(Trend::Constant, Tail::Left);
        let right = CriticalValues::lookup(Trend::Constant, Tail::Right);
        assert_eq!(left.get("5%"), Some(-2.86));
        assert_eq!(right.get("5%"), Some(2.86));
        assert_eq!(left.get("2.5%"), None);
        let ct = CriticalValues::lookup(Trend::ConstantTrend, Tail::Left);
        assert_eq!(ct.iter().map(|(_, v)| v).collect::<Vec<_>>(), vec![-3.96, -3.41, -3.13]);
    }

    #[test]
    fn critical_values_serialize_with_percent_keys() {
        let cv = CriticalValues::lookup(Trend::None, Tail::Left);
        let json = serde_json::to_value(cv).unwrap();
        assert_eq!(json["1%"], serde_json::json!(-2.58));
        assert_eq!(json["10%"], serde_json::json!(-1.62));
    }
}
