//! JSON export of analysis results.
//!
//! Every export wraps the result in a small envelope carrying the run
//! parameters and a UTC timestamp, so a file on disk is self-describing.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::AnalysisConfig;
use crate::error::StatsError;

#[derive(Debug, Serialize)]
pub struct ExportEnvelope<'a, R: Serialize> {
    pub tool: &'static str,
    pub version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub config: &'a AnalysisConfig,
    pub result: &'a R,
}

impl<'a, R: Serialize> ExportEnvelope<'a, R> {
    pub fn new(config: &'a AnalysisConfig, result: &'a R) -> Self {
        Self {
            tool: "tsstat",
            version: env!("CARGO_PKG_VERSION"),
            generated_at: Utc::now(),
            config,
            result,
        }
    }
}

/// Write `result` with its run config to `path` as pretty JSON.
pub fn write_json_report<R: Serialize>(
    path: &Path,
    config: &AnalysisConfig,
    result: &R,
) -> Result<(), StatsError> {
    let file = File::create(path)
        .map_err(|e| StatsError::invalid(format!("Failed to create export '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &ExportEnvelope::new(config, result))
        .map_err(|e| StatsError::invalid(format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

/// Write segments as `segment,value` CSV rows.
pub fn write_series_csv<W: Write>(out: W, segments: &[Vec<f64>]) -> Result<(), StatsError> {
    let mut writer = csv::Writer::from_writer(out);
    let io_err = |e: csv::Error| StatsError::invalid(format!("Failed to write series CSV: {e}"));

    writer.write_record(["segment", "value"]).map_err(io_err)?;
    for (i, seg) in segments.iter().enumerate() {
        let label = i.to_string();
        for v in seg {
            let value = v.to_string();
            writer.write_record([label.as_str(), value.as_str()]).map_err(io_err)?;
        }
    }
    writer
        .flush()
        .map_err(|e| StatsError::invalid(format!("Failed to flush series CSV: {e}")))?;
    Ok(())
}
