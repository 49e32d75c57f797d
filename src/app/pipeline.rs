//! Shared analysis pipeline behind the `tsstat` subcommands.
//!
//! Each `run_*` function loads its input, runs one analysis and returns a
//! serialisable output. The CLI layer only decides how to present it
//! (terminal report via `crate::report`, JSON via `crate::io::export`).

use serde::Serialize;
use tracing::{debug, warn};

use crate::acf::{auto_fit_range, fit_log_acf_window, MultiSegments};
use crate::adf::{adf_test, detect_ar, ljung_box_test};
use crate::data::ar1_segments;
use crate::domain::{
    AcfConfig, AcfMethod, AdfConfig, AdfResult, LjungBoxConfig, LjungBoxResult, LogAcfFit,
    ProcessKind, SeriesConfig, SimulateConfig,
};
use crate::error::StatsError;
use crate::io::{load_series, SeriesData};
use crate::math::{mean, welford_variance_population};

/// What was read from the input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSummary {
    pub path: String,
    pub log_transform: bool,
    pub segments: usize,
    pub values: usize,
    pub skipped_rows: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl InputSummary {
    pub fn from_data(config: &SeriesConfig, data: &SeriesData) -> Self {
        let all: Vec<f64> = data.segments.iter().flatten().copied().collect();
        Self {
            path: config.input.display().to_string(),
            log_transform: config.log_transform,
            segments: data.segments.len(),
            values: all.len(),
            skipped_rows: data.row_errors.len(),
            mean: mean(&all),
            std_dev: welford_variance_population(&all).sqrt(),
        }
    }
}

/// Outputs of `tsstat adf`.
#[derive(Debug, Clone, Serialize)]
pub struct AdfRun {
    pub input: InputSummary,
    pub result: AdfResult,
    /// Ljung–Box on the selected regression's residuals.
    pub residual_check: Option<LjungBoxResult>,
    /// AIC-best AR order of the residuals, when it could be estimated.
    pub residual_ar_order: Option<usize>,
}

pub fn run_adf(config: &AdfConfig) -> Result<AdfRun, StatsError> {
    let data = load_series(&config.series)?;
    let input = InputSummary::from_data(&config.series, &data);
    let series = data.single()?;

    let result = adf_test(series, config.trend, config.max_lag, config.lag_mode, config.tail)?;
    debug!(
        used_lag = result.used_lag,
        t_stat = result.t_stat,
        n_obs = result.n_obs,
        "ADF lag selected"
    );

    let (residual_check, residual_ar_order) = if config.resid_lags > 0 {
        let lb = ljung_box_test(&result.resids, config.resid_lags, config.alpha)?;
        let order = match detect_ar(&result.resids, config.resid_lags) {
            Ok((p, _)) => Some(p),
            Err(e) => {
                warn!(error = %e, "residual AR order detection failed");
                None
            }
        };
        (Some(lb), order)
    } else {
        (None, None)
    };

    Ok(AdfRun {
        input,
        result,
        residual_check,
        residual_ar_order,
    })
}

/// Outputs of `tsstat acf`.
#[derive(Debug, Clone, Serialize)]
pub struct AcfRun {
    pub input: InputSummary,
    pub method: AcfMethod,
    /// Pooled variance used to normalise the ACF.
    pub variance: f64,
    /// `acf[k]` for lags `0..max_lag`; `NaN` past the longest segment.
    pub acf: Vec<f64>,
    /// Window chosen for the power-law fit.
    pub fit_window: (usize, usize),
    /// `None` when the window holds too few positive lags.
    pub power_law: Option<LogAcfFit>,
}

pub fn run_acf(config: &AcfConfig) -> Result<AcfRun, StatsError> {
    let data = load_series(&config.series)?;
    let input = InputSummary::from_data(&config.series, &data);
    let segments = MultiSegments::new(data.segments)?;

    let acf = match config.method {
        AcfMethod::Direct => segments.auto_corr(config.max_lag)?,
        AcfMethod::Parallel => segments.auto_corr_parallel(config.max_lag)?,
        AcfMethod::Fft => segments.auto_corr_fft(config.max_lag)?,
    };

    let fit_window = auto_fit_range(&acf);
    let power_law = match fit_log_acf_window(&acf, fit_window.0, fit_window.1, config.min_points) {
        Ok(fit) => Some(fit),
        Err(e) => {
            warn!(error = %e, "power-law fit skipped");
            None
        }
    };

    Ok(AcfRun {
        input,
        method: config.method,
        variance: segments.variance(),
        acf,
        fit_window,
        power_law,
    })
}

/// Outputs of `tsstat ljung-box`.
#[derive(Debug, Clone, Serialize)]
pub struct LjungBoxRun {
    pub input: InputSummary,
    pub lags: usize,
    pub alpha: f64,
    pub result: LjungBoxResult,
}

pub fn run_ljung_box(config: &LjungBoxConfig) -> Result<LjungBoxRun, StatsError> {
    let data = load_series(&config.series)?;
    let input = InputSummary::from_data(&config.series, &data);
    let result = ljung_box_test(data.single()?, config.lags, config.alpha)?;
    Ok(LjungBoxRun {
        input,
        lags: config.lags,
        alpha: config.alpha,
        result,
    })
}

/// Generate the segments requested by `tsstat simulate`.
pub fn run_simulate(config: &SimulateConfig) -> Result<Vec<Vec<f64>>, StatsError> {
    if config.len == 0 || config.segments == 0 {
        return Err(StatsError::invalid(format!(
            "simulate needs len > 0 and segments > 0, got len={} segments={}",
            config.len, config.segments
        )));
    }
    let phi = match config.kind {
        ProcessKind::WhiteNoise => 0.0,
        ProcessKind::Ar1 => config.phi,
        ProcessKind::RandomWalk => 1.0,
    };
    debug!(kind = %config.kind, phi, len = config.len, segments = config.segments, "simulating");
    ar1_segments(config.segments, config.len, phi, config.sigma, config.seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LagMode, Tail, Trend};
    use crate::error::ErrorCode;
    use crate::io::write_series_csv;
    use std::path::PathBuf;

    fn write_temp(name: &str, segments: &[Vec<f64>]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tsstat-pipeline-{}-{name}.csv", std::process::id()));
        let file = std::fs::File::create(&path).unwrap();
        write_series_csv(file, segments).unwrap();
        path
    }

    fn series_config(input: PathBuf) -> SeriesConfig {
        SeriesConfig {
            input,
            log_transform: false,
            export: None,
        }
    }

    fn simulate(kind: ProcessKind, segments: usize, seed: u64) -> Vec<Vec<f64>> {
        run_simulate(&SimulateConfig {
            kind,
            len: 600,
            segments,
            phi: 0.5,
            sigma: 1.0,
            seed,
            output: None,
        })
        .unwrap()
    }

    #[test]
    fn adf_run_on_stationary_file_rejects_and_checks_residuals() {
        let segments = simulate(ProcessKind::Ar1, 1, 11);
        let path = write_temp("adf", &segments);
        let run = run_adf(&AdfConfig {
            series: series_config(path.clone()),
            trend: Trend::Constant,
            max_lag: 4,
            lag_mode: LagMode::Aic,
            tail: Tail::Left,
            resid_lags: 10,
            alpha: 0.05,
        })
        .unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(run.input.values, 600);
        assert!(run.result.rejects_at("5%").unwrap(), "t = {}", run.result.t_stat);
        assert!(run.residual_check.is_some());
        assert!(run.residual_ar_order.is_some());
    }

    #[test]
    fn adf_run_refuses_segmented_input() {
        let segments = simulate(ProcessKind::WhiteNoise, 2, 3);
        let path = write_temp("adf-seg", &segments);
        let err = run_adf(&AdfConfig {
            series: series_config(path.clone()),
            trend: Trend::Constant,
            max_lag: 2,
            lag_mode: LagMode::Bic,
            tail: Tail::Left,
            resid_lags: 0,
            alpha: 0.05,
        })
        .unwrap_err();
        std::fs::remove_file(path).ok();
        assert_eq!(err.code(), ErrorCode::InvalidValue);
    }

    #[test]
    fn acf_run_methods_agree_on_pooled_segments() {
        let segments = simulate(ProcessKind::Ar1, 3, 21);
        let path = write_temp("acf", &segments);
        let run = |method: AcfMethod| {
            run_acf(&AcfConfig {
                series: series_config(path.clone()),
                max_lag: 40,
                method,
                min_points: 3,
            })
            .unwrap()
        };
        let direct = run(AcfMethod::Direct);
        let fft = run(AcfMethod::Fft);
        let parallel = run(AcfMethod::Parallel);
        std::fs::remove_file(&path).ok();

        assert_eq!(direct.input.segments, 3);
        assert_eq!(direct.acf.len(), 40);
        for k in 0..40 {
            assert!((direct.acf[k] - fft.acf[k]).abs() < 1e-8, "lag {k}");
            assert!((direct.acf[k] - parallel.acf[k]).abs() < 1e-12, "lag {k}");
        }
        assert!((direct.acf[1] - 0.5).abs() < 0.06, "acf[1] = {}", direct.acf[1]);
    }

    #[test]
    fn ljung_box_run_accepts_white_noise() {
        let segments = simulate(ProcessKind::WhiteNoise, 1, 5);
        let path = write_temp("lb", &segments);
        let run = run_ljung_box(&LjungBoxConfig {
            series: series_config(path.clone()),
            lags: 10,
            alpha: 0.01,
        })
        .unwrap();
        std::fs::remove_file(path).ok();
        assert!(run.result.q >= 0.0);
        assert!(run.result.p_value > 0.0 && run.result.p_value <= 1.0);
    }

    #[test]
    fn simulate_shapes_and_validation() {
        let walk = simulate(ProcessKind::RandomWalk, 2, 9);
        assert_eq!(walk.len(), 2);
        assert!(walk.iter().all(|s| s.len() == 600));
        // Same seed, same paths.
        assert_eq!(walk, simulate(ProcessKind::RandomWalk, 2, 9));

        let err = run_simulate(&SimulateConfig {
            kind: ProcessKind::Ar1,
            len: 0,
            segments: 1,
            phi: 0.5,
            sigma: 1.0,
            seed: 1,
            output: None,
        })
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidValue);
    }
}
