//! # cautil-secrets
//!
//! Secret storage and reconciliation for ca-util:
//!
//! - [`SecretStore`]: a namespaced list/create store, with in-memory and
//!   directory-backed implementations
//! - [`SecretEntry`]: the persisted TLS entry layout (`ca.crt`, `tls.crt`,
//!   `tls.key`, `createdBy` label)
//! - [`Reconciler`]: creates entries for certificate specs whose entry is
//!   missing and leaves existing ones alone
//!
//! ## Example
//!
//! ```rust
//! use cautil_pki::CertificateSpec;
//! use cautil_secrets::{MemorySecretStore, Reconciler};
//!
//! let mut spec = CertificateSpec::authority("Example Org");
//! assert!(spec.finalize().is_empty());
//!
//! let reconciler = Reconciler::new(MemorySecretStore::new());
//! let created = reconciler.reconcile("default", &[&spec]).expect("reconcile");
//! assert_eq!(created.len(), 1);
//!
//! // Running again finds ExampleOrg-tls and creates nothing.
//! let created = reconciler.reconcile("default", &[&spec]).expect("reconcile");
//! assert!(created.is_empty());
//! ```

pub mod dir;
pub mod error;
pub mod reconcile;
pub mod store;
pub mod types;

pub use dir::DirSecretStore;
pub use error::{Error, Result};
pub use reconcile::{Partition, Reconciler};
pub use store::{MemorySecretStore, SecretStore};
pub use types::{
    validate_name, SecretData, SecretEntry, CA_CERT_KEY, CA_UTIL_CREATOR, CREATED_BY_LABEL,
    ROOT_CA_CREATOR, TLS_CERT_KEY, TLS_KEY_KEY, TLS_SECRET_TYPE,
};
