//! Store entry types.
//!
//! A [`SecretEntry`] is the persisted form of an issued key pair: a named,
//! namespaced record with labels, a type and a string payload. TLS entries
//! use the conventional payload keys [`CA_CERT_KEY`], [`TLS_CERT_KEY`] and
//! [`TLS_KEY_KEY`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use cautil_pki::KeyPair;

use crate::error::{Error, Result};

/// Payload key holding the CA certificate.
pub const CA_CERT_KEY: &str = "ca.crt";

/// Payload key holding the certificate.
pub const TLS_CERT_KEY: &str = "tls.crt";

/// Payload key holding the private key.
pub const TLS_KEY_KEY: &str = "tls.key";

/// Entry type for TLS key pairs.
pub const TLS_SECRET_TYPE: &str = "tls";

/// Label recording which tool created an entry.
pub const CREATED_BY_LABEL: &str = "createdBy";

/// Provenance label value for entries created from certificate specs.
pub const CA_UTIL_CREATOR: &str = "ca-util";

/// Provenance label value for the fixed root authority entry.
pub const ROOT_CA_CREATOR: &str = "root-ca-creator";

/// Longest accepted entry or namespace name.
pub const MAX_NAME_LENGTH: usize = 253;

/// Entry payload. Values are zeroized on drop since they carry private keys.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretData(BTreeMap<String, String>);

impl SecretData {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key/value pair.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterates over payload keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the number of payload keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for SecretData {
    fn drop(&mut self) {
        self.0.values_mut().for_each(Zeroize::zeroize);
    }
}

impl fmt::Debug for SecretData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.keys().map(|k| (k, "[REDACTED]")))
            .finish()
    }
}

/// A named, namespaced record in a secret store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretEntry {
    /// Entry name, unique within its namespace.
    pub name: String,
    /// Namespace the entry lives in.
    pub namespace: String,
    /// Free-form labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Entry type, e.g. [`TLS_SECRET_TYPE`].
    #[serde(rename = "type")]
    pub secret_type: String,
    /// String payload.
    #[serde(default)]
    pub data: SecretData,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

impl SecretEntry {
    /// Builds a TLS entry for a key pair.
    ///
    /// `ca.crt` and `tls.crt` both carry the certificate; `tls.key` carries
    /// the private key. The entry is labelled `createdBy=<created_by>`.
    #[must_use]
    pub fn tls(
        name: impl Into<String>,
        namespace: impl Into<String>,
        created_by: &str,
        pair: &KeyPair,
    ) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert(CREATED_BY_LABEL.to_string(), created_by.to_string());

        let mut data = SecretData::new();
        data.insert(CA_CERT_KEY, pair.cert_pem());
        data.insert(TLS_CERT_KEY, pair.cert_pem());
        data.insert(TLS_KEY_KEY, pair.key_pem());

        Self {
            name: name.into(),
            namespace: namespace.into(),
            labels,
            secret_type: TLS_SECRET_TYPE.to_string(),
            data,
            created_at: Utc::now(),
        }
    }

    /// Returns the value of the `createdBy` label.
    #[must_use]
    pub fn created_by(&self) -> Option<&str> {
        self.labels.get(CREATED_BY_LABEL).map(String::as_str)
    }
}

/// Validates an entry or namespace name.
///
/// Names must be non-empty, at most [`MAX_NAME_LENGTH`] bytes, free of path
/// separators and control characters, and not `.` or `..`.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] describing the first violation.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(invalid(&format!(
            "name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    if name == "." || name == ".." {
        return Err(invalid("name cannot be a relative path component"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("name contains a path separator"));
    }
    if name.chars().any(char::is_control) {
        return Err(invalid("name contains a control character"));
    }

    Ok(())
}
