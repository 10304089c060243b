//! PKI error types.

use thiserror::Error;

/// Result type for PKI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// PKI error variants.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more certificate specs failed validation.
    #[error("certificate spec validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A spec reached the generator before its validity window was resolved.
    #[error("certificate spec '{0}' has not been finalized")]
    NotFinalized(String),

    /// A duration string could not be parsed.
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration {
        /// The offending input.
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// The OS random source failed.
    #[error("random number generation failed: {0}")]
    Random(String),

    /// Private key generation failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Certificate generation or signing failed.
    #[error("certificate generation failed: {0}")]
    Generation(String),

    /// PEM/DER encoding failed.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// Certificate parsing failed.
    #[error("certificate parsing failed: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_joins_messages() {
        let err = Error::Validation(vec!["first".into(), "second".into()]);
        assert_eq!(
            err.to_string(),
            "certificate spec validation failed: first; second"
        );
    }

    #[test]
    fn invalid_duration_display() {
        let err = Error::InvalidDuration {
            input: "soon".into(),
            reason: "missing unit".into(),
        };
        assert_eq!(err.to_string(), "invalid duration 'soon': missing unit");
    }
}
