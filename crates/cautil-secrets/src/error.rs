//! Error types for secret storage and reconciliation.

use thiserror::Error;

/// Errors that can occur while talking to a secret store or reconciling.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid secret or namespace name.
    #[error("invalid name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// The reason the name is invalid.
        reason: String,
    },

    /// An entry with this name already exists in the namespace.
    #[error("secret '{name}' already exists in namespace '{namespace}'")]
    AlreadyExists {
        /// Namespace of the conflicting entry.
        namespace: String,
        /// Name of the conflicting entry.
        name: String,
    },

    /// The backing store failed to list or create.
    #[error("secret store error: {reason}")]
    Store {
        /// What went wrong.
        reason: String,
    },

    /// Filesystem error from a directory-backed store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed.
    #[error("serialization error: {reason}")]
    Serialization {
        /// The reason serialization failed.
        reason: String,
    },

    /// Key pair generation failed.
    #[error(transparent)]
    Pki(#[from] cautil_pki::Error),
}

/// Result type alias for secret store operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        let err = Error::AlreadyExists {
            namespace: "default".to_string(),
            name: "MyCert-tls".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "secret 'MyCert-tls' already exists in namespace 'default'"
        );

        let err = Error::Store {
            reason: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "secret store error: connection refused");

        let err = Error::InvalidName {
            name: "../etc".to_string(),
            reason: "contains a path separator".to_string(),
        };
        assert_eq!(err.to_string(), "invalid name '../etc': contains a path separator");
    }

    #[test]
    fn pki_errors_pass_through() {
        let err = Error::from(cautil_pki::Error::Random("entropy exhausted".into()));
        assert_eq!(err.to_string(), "random number generation failed: entropy exhausted");
    }
}
