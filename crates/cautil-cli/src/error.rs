//! CLI error types.

use std::fmt;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// The config file could not be read or parsed.
    Config(String),
    /// One or more certificate specs failed validation.
    Validation(Vec<String>),
    /// Invalid argument combination.
    InvalidArgument(String),
    /// Output formatting error.
    Format(String),
    /// Certificate generation failed.
    Pki(cautil_pki::Error),
    /// Secret store or reconciliation failed.
    Secrets(cautil_secrets::Error),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Validation(errors) => {
                write!(f, "config validation failed:")?;
                for e in errors {
                    write!(f, "\n  {e}")?;
                }
                Ok(())
            }
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::Pki(e) => write!(f, "error creating certs: {e}"),
            Self::Secrets(e) => write!(f, "error creating secrets: {e}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pki(e) => Some(e),
            Self::Secrets(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<cautil_pki::Error> for CliError {
    fn from(err: cautil_pki::Error) -> Self {
        match err {
            cautil_pki::Error::Validation(errors) => Self::Validation(errors),
            other => Self::Pki(other),
        }
    }
}

impl From<cautil_secrets::Error> for CliError {
    fn from(err: cautil_secrets::Error) -> Self {
        Self::Secrets(err)
    }
}
