//! Estimating error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// An input was missing, non-finite, or out of range.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn positive(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::InvalidInput {
            field,
            reason: format!("{value} is not a finite number"),
        });
    }
    if value <= 0.0 {
        return Err(Error::InvalidInput {
            field,
            reason: format!("{value} must be greater than zero"),
        });
    }
    Ok(value)
}

/// Reject a computed value that overflowed.
pub(crate) fn finite_result(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidInput {
            field: "result",
            reason: format!("inputs produce {value}, which is out of range"),
        })
    }
}
