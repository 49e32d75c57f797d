//! Command-line parsing for `tsstat`.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! statistics code; `crate::app` turns parsed arguments into an
//! [`AnalysisConfig`](crate::domain::AnalysisConfig) and dispatches it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{AcfMethod, LagMode, ProcessKind, Tail, Trend};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tsstat", version, about = "Time-series diagnostics: ADF, ACF, Ljung-Box")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Augmented Dickey-Fuller unit-root test on a single series.
    Adf(AdfArgs),
    /// Pooled autocorrelation and power-law decay fit.
    Acf(AcfArgs),
    /// Ljung-Box white-noise test.
    LjungBox(LjungBoxArgs),
    /// Write a synthetic series as `segment,value` CSV.
    Simulate(SimulateArgs),
}

/// Input options shared by the analysis subcommands.
#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    /// Series file: one value per line, or CSV with a `value` and optional
    /// `segment` column.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Take the natural log of every value (prices -> log-prices).
    #[arg(long)]
    pub log: bool,

    /// Write the result and run parameters to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct AdfArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Deterministic terms: n (none), c (constant), ct (constant + trend).
    #[arg(long, value_enum, default_value_t = Trend::Constant)]
    pub trend: Trend,

    /// Largest lag of the differenced series tried.
    #[arg(long, default_value_t = 12)]
    pub max_lag: usize,

    /// Lag selection criterion.
    #[arg(long, value_enum, default_value_t = LagMode::Aic)]
    pub lag_mode: LagMode,

    /// Left tests against stationarity, right against explosive behaviour.
    #[arg(long, value_enum, default_value_t = Tail::Left)]
    pub tail: Tail,

    /// Ljung-Box lags on the regression residuals (0 disables the check).
    #[arg(long, default_value_t = 10)]
    pub resid_lags: usize,

    /// Significance level of the residual check.
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,
}

#[derive(Debug, Args, Clone)]
pub struct AcfArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Number of lags computed (lags 0..max_lag).
    #[arg(long, default_value_t = 100)]
    pub max_lag: usize,

    #[arg(long, value_enum, default_value_t = AcfMethod::Fft)]
    pub method: AcfMethod,

    /// Minimum positive lags required for the power-law fit.
    #[arg(long, default_value_t = 5)]
    pub min_points: usize,
}

#[derive(Debug, Args, Clone)]
pub struct LjungBoxArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    #[arg(long, default_value_t = 10)]
    pub lags: usize,

    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,
}

#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    #[arg(long, value_enum, default_value_t = ProcessKind::Ar1)]
    pub kind: ProcessKind,

    /// Samples per segment.
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub len: usize,

    #[arg(long, default_value_t = 1)]
    pub segments: usize,

    /// AR(1) coefficient.
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    pub phi: f64,

    /// Innovation standard deviation.
    #[arg(long, default_value_t = 1.0)]
    pub sigma: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV (stdout when omitted).
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}
