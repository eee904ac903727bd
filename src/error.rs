//! Error taxonomy shared by the amortization engine, the rate estimator
//! and the request layer

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoanError {
    /// A caller-supplied value failed a precondition
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Arithmetic produced a value that cannot be reported (overflow, NaN)
    #[error("Computation fault: {0}")]
    ComputationFault(String),
}

pub type LoanResult<T> = Result<T, LoanError>;

impl LoanError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn fault(description: impl Into<String>) -> Self {
        LoanError::ComputationFault(description.into())
    }

    /// HTTP status code the request layer reports for this error
    pub fn status_code(&self) -> u16 {
        match self {
            LoanError::InvalidInput { .. } => 400,
            LoanError::ComputationFault(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, LoanError::InvalidInput { .. })
    }
}

/// Reject NaN and infinite intermediate results before they are emitted
pub(crate) fn ensure_finite(value: f64, what: &str) -> LoanResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LoanError::fault(format!("{} is not a finite number ({})", what, value)))
    }
}
