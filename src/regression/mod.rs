//! Linear models.
//!
//! - [`ols`]: ordinary least squares with Gaussian inference and SVD fallback
//! - [`lasso`]: L1-penalised linear (coordinate descent) and logistic (ISTA) fits
//! - [`standardize`]: column centring/scaling shared by the penalised solvers
//! - [`simple`]: NaN-tolerant two-variable slope/intercept

pub mod lasso;
pub mod ols;
pub mod simple;
pub mod standardize;

pub use lasso::{lasso, lasso_with_options, logistic_objective, soft_threshold};
pub use ols::{ols, ols_mat};
pub use simple::simple_regression;
pub use standardize::{standardize_columns, Standardization};
