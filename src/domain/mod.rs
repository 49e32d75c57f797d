//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - tag enums (`Trend`, `LagMode`, `Tail`, `CorrelateMode`, `BootstrapMethod`, `AcfMethod`)
//! - fit outputs (`RegressionResult`, `AdfResult`, `LogAcfFit`, etc.)
//! - solver and run configuration (`LassoOptions`, `AdfConfig`, ...)

pub mod types;

pub use types::*;
