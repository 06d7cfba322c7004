//! Error taxonomy shared by the operation library and the evaluator.

use thiserror::Error;

/// Convenience alias used across the calculator modules.
pub type Result<T> = std::result::Result<T, CalcError>;

/// Every recoverable failure the calculator can report.
///
/// None of these are fatal: sessions display them and let the user retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// A divisor, modulus or floor-divisor was zero.
    #[error("{0}")]
    DivisionByZero(&'static str),

    /// An argument fell outside the function's domain.
    #[error("{0}")]
    DomainError(String),

    /// `clamp` was called with a minimum above the maximum.
    #[error("{0}")]
    InvalidRange(String),

    /// Empty input, unknown identifier, bad syntax, or a failure raised while
    /// evaluating. Wrapped failures keep the original error as `cause`.
    #[error("{message}")]
    InvalidExpression {
        message: String,
        #[source]
        cause: Option<Box<CalcError>>,
    },

    /// The expression evaluated to something that is not a number.
    #[error("Expression did not evaluate to a numeric result")]
    NonNumericResult,

    /// User input could not be read as a number.
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

impl CalcError {
    pub fn domain(message: impl Into<String>) -> Self {
        Self::DomainError(message.into())
    }

    /// An evaluation failure with no underlying cause.
    pub fn invalid_expression(message: impl Into<String>) -> Self {
        Self::InvalidExpression {
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap a failure raised during evaluation, keeping its message visible.
    pub fn evaluation(cause: CalcError) -> Self {
        match cause {
            // Already wrapped once; don't stack prefixes.
            Self::InvalidExpression { .. } | Self::NonNumericResult => cause,
            other => Self::InvalidExpression {
                message: format!("Error evaluating expression: {}", other),
                cause: Some(Box::new(other)),
            },
        }
    }

    /// The wrapped error, if this is a wrapped evaluation failure.
    pub fn cause(&self) -> Option<&CalcError> {
        match self {
            Self::InvalidExpression { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }

    /// Short stable name of the error kind, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DivisionByZero(_) => "division_by_zero",
            Self::DomainError(_) => "domain_error",
            Self::InvalidRange(_) => "invalid_range",
            Self::InvalidExpression { .. } => "invalid_expression",
            Self::NonNumericResult => "non_numeric_result",
            Self::InvalidNumber(_) => "invalid_number",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_wraps_domain_error() {
        let err = CalcError::evaluation(CalcError::domain("Square root of negative number"));
        assert_eq!(
            err.to_string(),
            "Error evaluating expression: Square root of negative number"
        );
        assert!(matches!(err.cause(), Some(CalcError::DomainError(_))));
    }

    #[test]
    fn test_evaluation_does_not_double_wrap() {
        let inner = CalcError::invalid_expression("name 'x' is not defined");
        let err = CalcError::evaluation(inner.clone());
        assert_eq!(err, inner);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(CalcError::DivisionByZero("Division by zero").kind(), "division_by_zero");
        assert_eq!(CalcError::NonNumericResult.kind(), "non_numeric_result");
    }
}
