//! Series ingest from CSV / one-value-per-line text.
//!
//! Accepted layouts:
//! - one number per line, no header
//! - a header row naming the columns; the value column is `value` (or the
//!   first column not called `segment`), and an optional `segment` column
//!   groups rows into independent segments
//!
//! Rows that fail to parse are skipped and reported, the same way a bad row in
//! a wide CSV never aborts the whole load. An input with no usable rows is an
//! `EMPTY_VALUE` error.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::SeriesConfig;
use crate::error::StatsError;

/// A row that was skipped during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Parsed input: one or more segments in first-appearance order.
#[derive(Debug, Clone)]
pub struct SeriesData {
    pub segments: Vec<Vec<f64>>,
    pub labels: Vec<String>,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

impl SeriesData {
    pub fn total_len(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    /// The single series, for analyses that do not pool segments.
    pub fn single(&self) -> Result<&[f64], StatsError> {
        match self.segments.as_slice() {
            [only] => Ok(only),
            _ => Err(StatsError::invalid(format!(
                "expected a single series, input has {} segments",
                self.segments.len()
            ))),
        }
    }
}

/// Load the file named by `config.input`.
pub fn load_series(config: &SeriesConfig) -> Result<SeriesData, StatsError> {
    let mut file = File::open(&config.input).map_err(|e| {
        StatsError::invalid(format!("Failed to open series '{}': {e}", config.input.display()))
    })?;
    let mut text = String::new();
    file.read_to_string(&mut text).map_err(|e| {
        StatsError::invalid(format!("Failed to read series '{}': {e}", config.input.display()))
    })?;

    let data = parse_series(&text, config.log_transform)?;
    debug!(
        path = %config.input.display(),
        segments = data.segments.len(),
        values = data.total_len(),
        skipped = data.row_errors.len(),
        "series loaded"
    );
    if !data.row_errors.is_empty() {
        warn!(skipped = data.row_errors.len(), "some input rows were skipped");
    }
    Ok(data)
}

/// Parse series text; see the module docs for the accepted layouts.
pub fn parse_series(text: &str, log_transform: bool) -> Result<SeriesData, StatsError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        match result {
            Ok(record) if record.iter().all(str::is_empty) => {}
            Ok(record) => {
                // Blank lines are skipped by the reader, so prefer its position.
                let line = record.position().map_or(idx + 1, |p| p.line() as usize);
                records.push((line, record));
            }
            Err(e) => row_errors.push(RowError {
                line: idx + 1,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    let Some((_, first)) = records.first() else {
        return Err(StatsError::empty("series input has no rows"));
    };
    let layout = Layout::detect(first)?;
    let body = if layout.has_header { &records[1..] } else { &records[..] };

    let mut segments: Vec<Vec<f64>> = Vec::new();
    let mut labels: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (line, record) in body {
        let value = match parse_value(record, layout.value_col, log_transform) {
            Ok(v) => v,
            Err(message) => {
                row_errors.push(RowError { line: *line, message });
                continue;
            }
        };
        let label = layout
            .segment_col
            .and_then(|c| record.get(c))
            .unwrap_or_default()
            .to_string();
        let slot = *index.entry(label.clone()).or_insert_with(|| {
            segments.push(Vec::new());
            labels.push(label);
            segments.len() - 1
        });
        segments[slot].push(value);
    }

    if segments.iter().all(Vec::is_empty) {
        return Err(StatsError::empty("series input has no valid values"));
    }

    Ok(SeriesData {
        segments,
        labels,
        rows_read: body.len(),
        row_errors,
    })
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    has_header: bool,
    value_col: usize,
    segment_col: Option<usize>,
}

impl Layout {
    fn detect(first: &StringRecord) -> Result<Self, StatsError> {
        let numeric = first.iter().all(|f| f.parse::<f64>().is_ok());
        if numeric {
            return Ok(Self {
                has_header: false,
                value_col: 0,
                segment_col: None,
            });
        }

        let names: Vec<String> = first
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
            .collect();
        let segment_col = names.iter().position(|n| n == "segment");
        let value_col = names
            .iter()
            .position(|n| n == "value")
            .or_else(|| (0..names.len()).find(|i| Some(*i) != segment_col))
            .ok_or_else(|| StatsError::invalid("header has no value column"))?;

        Ok(Self {
            has_header: true,
            value_col,
            segment_col,
        })
    }
}

fn parse_value(record: &StringRecord, col: usize, log_transform: bool) -> Result<f64, String> {
    let raw = record
        .get(col)
        .ok_or_else(|| format!("missing value column {}", col + 1))?;
    let v: f64 = raw.parse().map_err(|_| format!("not a number: '{raw}'"))?;
    if !v.is_finite() {
        return Err(format!("non-finite value: '{raw}'"));
    }
    if log_transform {
        if v <= 0.0 {
            return Err(format!("cannot take log of {v}"));
        }
        return Ok(v.ln());
    }
    Ok(v)
}
