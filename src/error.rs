//! Error taxonomy for the calculation engine

use thiserror::Error;

/// Errors raised by the amortization and refinance engines
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Malformed or out-of-range input. Reported to the caller, never a crash.
    #[error("Invalid input: {field} - {reason}")]
    Validation { field: String, reason: String },

    /// Numerical guard tripped (non-finite value, iteration cap)
    #[error("Computation failed in {context}: {reason}")]
    Computation { context: String, reason: String },
}

impl EngineError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn computation(context: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Computation {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation { .. })
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Reject NaN/infinite values and values not strictly above zero
pub(crate) fn require_positive(field: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::validation(field, format!("must be a number greater than zero, got {}", value)));
    }
    Ok(())
}

/// Reject NaN/infinite and negative values
pub(crate) fn require_non_negative(field: &str, value: f64) -> EngineResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::validation(field, format!("must be a non-negative number, got {}", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = EngineError::validation("loan_amount", "must be positive");
        assert_eq!(err.to_string(), "Invalid input: loan_amount - must be positive");
        assert!(err.is_validation());
    }

    #[test]
    fn test_require_positive_rejects_nan_and_zero() {
        assert!(require_positive("x", f64::NAN).is_err());
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", -1.0).is_err());
        assert!(require_positive("x", 0.01).is_ok());
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("x", 0.0).is_ok());
        assert!(require_non_negative("x", f64::INFINITY).is_err());
        assert!(!EngineError::computation("loop", "cap").is_validation());
    }
}
