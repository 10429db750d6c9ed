//! Error types for time conversions

use thiserror::Error;

/// Error type for time operations
#[derive(Debug, Error, PartialEq)]
pub enum TimeError {
    #[error("Parsing error: {0}")]
    ParseError(String),

    #[error("Invalid time units: {0}")]
    InvalidUnits(String),

    #[error("Calendar error: {0}")]
    CalendarError(String),

    /// Epoch string that is neither a registry name nor a date
    #[error("Unknown epoch: {0}")]
    UnknownEpoch(String),

    #[error("Invalid delta time table: {0}")]
    InvalidTable(String),

    /// Scale or step that must be finite and strictly positive
    #[error("Invalid scale factor: {0}")]
    InvalidScale(f64),

    #[error("Time out of range: {0}")]
    OutOfRange(String),
}

/// Result type for time operations
pub type Result<T> = std::result::Result<T, TimeError>;

/// Reject scale factors and step sizes that cannot be divided by
pub(crate) fn check_scale(scale: f64) -> Result<f64> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(TimeError::InvalidScale(scale))
    }
}
