//! Input/output helpers.
//!
//! - series ingest from CSV / plain text (`series`)
//! - JSON report and CSV series exports (`export`)

pub mod export;
pub mod series;

pub use export::*;
pub use series::*;
