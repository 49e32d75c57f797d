//! Terminal reports for ADF, ACF, Ljung–Box and regression results.

pub mod format;

pub use format::*;
