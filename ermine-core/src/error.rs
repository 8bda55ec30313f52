//! Error types for Ermine property-based testing.
//!
//! Recoverable failures are structured values, never panics: malformed
//! configuration surfaces as a [`ValidationProblem`], numeric branding
//! failures as [`NumericError`], and range construction failures as
//! [`RangeError`]. Fatal invariant violations (a generator stream
//! terminating, a corrupt tree during replay) abort via panic instead.

use std::fmt;
use thiserror::Error;

/// Failure to brand a value with a numeric subtype.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    /// The value is not a finite real number.
    #[error("not a finite real number: {0}")]
    NotReal(String),

    /// The value is not integral.
    #[error("not an integer: {0}")]
    NotInteger(String),

    /// The value is not a non-negative integer.
    #[error("not a natural number: {0}")]
    NotNatural(String),

    /// The value is not the constant zero.
    #[error("not zero: {0}")]
    NotZero(String),

    /// The value is not the constant one.
    #[error("not one: {0}")]
    NotOne(String),
}

/// Invalid range construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// The shrink origin lies outside the inclusive bounds.
    #[error("origin {origin} lies outside the bounds [{min}, {max}]")]
    OriginOutsideBounds { min: i64, max: i64, origin: i64 },
}

/// Which configuration field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    Iterations,
    Size,
    ShrinkPath,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationKind::Iterations => write!(f, "iterations"),
            ValidationKind::Size => write!(f, "size"),
            ValidationKind::ShrinkPath => write!(f, "shrink path"),
        }
    }
}

/// A malformed property configuration, reported before any generation
/// occurs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {message}")]
pub struct ValidationProblem {
    pub kind: ValidationKind,
    pub message: String,
}

impl ValidationProblem {
    pub fn new(kind: ValidationKind, message: impl Into<String>) -> Self {
        ValidationProblem {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_error_messages() {
        assert_eq!(
            NumericError::NotInteger("1.5".to_string()).to_string(),
            "not an integer: 1.5"
        );
        assert_eq!(
            NumericError::NotNatural("-3".to_string()).to_string(),
            "not a natural number: -3"
        );
    }

    #[test]
    fn test_range_error_message() {
        let err = RangeError::OriginOutsideBounds {
            min: 0,
            max: 10,
            origin: 50,
        };
        assert_eq!(err.to_string(), "origin 50 lies outside the bounds [0, 10]");
    }

    #[test]
    fn test_validation_problem_display() {
        let problem = ValidationProblem::new(
            ValidationKind::Iterations,
            "iterations must be a positive integer",
        );
        assert_eq!(
            problem.to_string(),
            "invalid iterations: iterations must be a positive integer"
        );
    }
}
