//! Unit-root testing and residual diagnostics.
//!
//! - [`unit_root`]: ADF test with AIC/BIC/t-stat lag selection
//! - [`ljung_box`]: portmanteau test for residual autocorrelation
//! - [`bootstrap`]: residual resampling
//! - [`ar`]: AR order detection on residuals

pub mod ar;
pub mod bootstrap;
pub mod ljung_box;
pub mod unit_root;

pub use ar::detect_ar;
pub use bootstrap::{simulate_white_noise, simulate_white_noise_with_rng};
pub use ljung_box::ljung_box_test;
pub use unit_root::{adf_design, adf_test, MIN_ADF_OBS};
