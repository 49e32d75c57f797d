//! Error type shared by every fallible operation in the crate.
//!
//! Errors carry a coarse [`ErrorCode`] suitable for structured logging and a
//! human-readable message. A failed call never returns a partially filled
//! result alongside the error.

use std::fmt;

use thiserror::Error;

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The caller supplied an empty matrix, vector or segment set.
    EmptyValue,
    /// Mis-shaped input, out-of-range parameter, unknown tag, or a numerical
    /// failure the solver cannot recover from.
    InvalidValue,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptyValue => "EMPTY_VALUE",
            ErrorCode::InvalidValue => "INVALID_VALUE",
        }
    }

    /// Process exit code used by the `tsstat` binary.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::EmptyValue => 3,
            ErrorCode::InvalidValue => 2,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
#[error("{code}: {message}")]
pub struct StatsError {
    code: ErrorCode,
    message: String,
}

impl StatsError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EmptyValue, message)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidValue, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> u8 {
        self.code.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_message() {
        let err = StatsError::invalid("maxLag must be > 0");
        assert_eq!(err.to_string(), "INVALID_VALUE: maxLag must be > 0");
        assert_eq!(err.code(), ErrorCode::InvalidValue);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_maps_to_its_own_exit_code() {
        let err = StatsError::empty("segments is empty");
        assert_eq!(err.code().as_str(), "EMPTY_VALUE");
        assert_eq!(err.exit_code(), 3);
    }
}
