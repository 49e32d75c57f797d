//! Numeric primitives: matrix helpers, FFT, correlation, histograms.

pub mod correlate;
pub mod describe;
pub mod fft;
pub mod hist;
pub mod matrix;

pub use correlate::*;
pub use describe::*;
pub use fft::*;
pub use hist::*;
pub use matrix::*;
