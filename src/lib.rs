//! `ts-stats` library crate.
//!
//! Statistical building blocks for financial time series: OLS and LASSO
//! regression, autocorrelation over one or many segments, the augmented
//! Dickey–Fuller unit-root test, Ljung–Box, residual bootstrap and a few
//! signal-processing helpers.
//!
//! The binary (`tsstat`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the numeric modules carry no I/O or terminal concerns

pub mod acf;
pub mod adf;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod regression;
pub mod report;

pub use error::{ErrorCode, StatsError};
