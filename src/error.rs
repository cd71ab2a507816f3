//! Error types for the mtsim library.

use thiserror::Error;

/// Result type alias for mtsim operations.
pub type Result<T> = std::result::Result<T, MtsError>;

/// Errors that can occur while building or querying multivariate time series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MtsError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Argument length/count mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// An operation was invoked while a required structural invariant is false.
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// Lookup or removal by a variable name that does not exist.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// Positional access beyond series bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Normalization attempted on a constant-valued variable (zero range).
    #[error("degenerate range: variable '{0}' is constant")]
    DegenerateRange(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = MtsError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = MtsError::DimensionMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 3, got 2");

        let err = MtsError::UnknownVariable("hr".to_string());
        assert_eq!(err.to_string(), "unknown variable: hr");

        let err = MtsError::PreconditionViolation("data must be even".to_string());
        assert_eq!(err.to_string(), "precondition violated: data must be even");

        let err = MtsError::DegenerateRange("temp".to_string());
        assert_eq!(
            err.to_string(),
            "degenerate range: variable 'temp' is constant"
        );
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = MtsError::IndexOutOfBounds { index: 5, size: 3 };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
