//! Autocorrelation estimation and power-law decay fitting.

pub mod powerlaw;
pub mod segments;
pub mod single;

pub use powerlaw::{auto_fit_range, fit_log_acf, fit_log_acf_window};
pub use segments::MultiSegments;
pub use single::auto_corr_single;
