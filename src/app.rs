//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs the log subscriber
//! - parses CLI arguments into an [`AnalysisConfig`]
//! - runs the analysis pipeline
//! - prints reports and writes optional exports

use std::fs::File;
use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{AcfArgs, AdfArgs, Cli, Command, LjungBoxArgs, SeriesArgs, SimulateArgs};
use crate::domain::{
    AcfConfig, AdfConfig, AnalysisConfig, LjungBoxConfig, SeriesConfig, SimulateConfig,
};
use crate::error::StatsError;
use crate::io::{write_json_report, write_series_csv};

pub mod pipeline;

/// Entry point for the `tsstat` binary.
pub fn run() -> Result<(), StatsError> {
    init_tracing();
    let cli = Cli::parse();
    execute(&config_from_command(&cli.command))
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Run one analysis and print its report.
pub fn execute(config: &AnalysisConfig) -> Result<(), StatsError> {
    match config {
        AnalysisConfig::Adf(c) => {
            let run = pipeline::run_adf(c)?;
            println!("{}", crate::report::format_adf(&run));
            export(config, &c.series, &run)
        }
        AnalysisConfig::Acf(c) => {
            let run = pipeline::run_acf(c)?;
            println!("{}", crate::report::format_acf(&run));
            export(config, &c.series, &run)
        }
        AnalysisConfig::LjungBox(c) => {
            let run = pipeline::run_ljung_box(c)?;
            println!("{}", crate::report::format_ljung_box(&run));
            export(config, &c.series, &run)
        }
        AnalysisConfig::Simulate(c) => {
            let segments = pipeline::run_simulate(c)?;
            match &c.output {
                Some(path) => {
                    let file = File::create(path).map_err(|e| {
                        StatsError::invalid(format!("Failed to create '{}': {e}", path.display()))
                    })?;
                    write_series_csv(file, &segments)?;
                    println!(
                        "Wrote {} x {} {} samples to {}",
                        c.segments,
                        c.len,
                        c.kind,
                        path.display()
                    );
                }
                None => write_series_csv(io::stdout().lock(), &segments)?,
            }
            Ok(())
        }
    }
}

fn export<R: serde::Serialize>(
    config: &AnalysisConfig,
    series: &SeriesConfig,
    result: &R,
) -> Result<(), StatsError> {
    if let Some(path) = &series.export {
        write_json_report(path, config, result)?;
        tracing::info!(path = %path.display(), "report exported");
    }
    Ok(())
}

pub fn config_from_command(command: &Command) -> AnalysisConfig {
    match command {
        Command::Adf(args) => AnalysisConfig::Adf(adf_config_from_args(args)),
        Command::Acf(args) => AnalysisConfig::Acf(acf_config_from_args(args)),
        Command::LjungBox(args) => AnalysisConfig::LjungBox(ljung_box_config_from_args(args)),
        Command::Simulate(args) => AnalysisConfig::Simulate(simulate_config_from_args(args)),
    }
}

fn series_config_from_args(args: &SeriesArgs) -> SeriesConfig {
    SeriesConfig {
        input: args.input.clone(),
        log_transform: args.log,
        export: args.export.clone(),
    }
}

pub fn adf_config_from_args(args: &AdfArgs) -> AdfConfig {
    AdfConfig {
        series: series_config_from_args(&args.series),
        trend: args.trend,
        max_lag: args.max_lag,
        lag_mode: args.lag_mode,
        tail: args.tail,
        resid_lags: args.resid_lags,
        alpha: args.alpha,
    }
}

pub fn acf_config_from_args(args: &AcfArgs) -> AcfConfig {
    AcfConfig {
        series: series_config_from_args(&args.series),
        max_lag: args.max_lag,
        method: args.method,
        min_points: args.min_points,
    }
}

pub fn ljung_box_config_from_args(args: &LjungBoxArgs) -> LjungBoxConfig {
    LjungBoxConfig {
        series: series_config_from_args(&args.series),
        lags: args.lags,
        alpha: args.alpha,
    }
}

pub fn simulate_config_from_args(args: &SimulateArgs) -> SimulateConfig {
    SimulateConfig {
        kind: args.kind,
        len: args.len,
        segments: args.segments,
        phi: args.phi,
        sigma: args.sigma,
        seed: args.seed,
        output: args.output.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AcfMethod, Trend};

    #[test]
    fn config_mirrors_parsed_arguments() {
        let cli = Cli::try_parse_from([
            "tsstat", "acf", "trades.csv", "--method", "parallel", "--max-lag", "64", "--export", "out.json",
        ])
        .unwrap();
        let AnalysisConfig::Acf(config) = config_from_command(&cli.command) else {
            panic!("expected acf config");
        };
        assert_eq!(config.method, AcfMethod::Parallel);
        assert_eq!(config.max_lag, 64);
        assert_eq!(config.series.export.as_deref(), Some(std::path::Path::new("out.json")));
        assert!(!config.series.log_transform);
    }

    #[test]
    fn simulate_then_analyse_with_export() {
        let dir = std::env::temp_dir();
        let csv = dir.join(format!("tsstat-app-{}.csv", std::process::id()));
        let json = dir.join(format!("tsstat-app-{}.json", std::process::id()));

        let simulate = Cli::try_parse_from([
            "tsstat",
            "simulate",
            "--kind",
            "random-walk",
            "-n",
            "300",
            "-o",
            csv.to_str().unwrap(),
        ])
        .unwrap();
        execute(&config_from_command(&simulate.command)).unwrap();

        let adf = Cli::try_parse_from([
            "tsstat",
            "adf",
            csv.to_str().unwrap(),
            "--max-lag",
            "3",
            "--export",
            json.to_str().unwrap(),
        ])
        .unwrap();
        let config = config_from_command(&adf.command);
        execute(&config).unwrap();

        let exported: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        std::fs::remove_file(&csv).ok();
        std::fs::remove_file(&json).ok();

        assert_eq!(exported["tool"], "tsstat");
        assert_eq!(exported["config"]["command"], "adf");
        assert_eq!(exported["config"]["trend"], serde_json::json!(Trend::Constant));
        assert_eq!(exported["result"]["input"]["values"], 300);
        assert!(exported["result"]["result"]["t_stat"].is_number());
    }

    #[test]
    fn missing_input_is_an_error() {
        let config = AnalysisConfig::LjungBox(LjungBoxConfig {
            series: SeriesConfig {
                input: "/nonexistent/tsstat/input.csv".into(),
                log_transform: false,
                export: None,
            },
            lags: 5,
            alpha: 0.05,
        });
        assert!(execute(&config).is_err());
    }
}
