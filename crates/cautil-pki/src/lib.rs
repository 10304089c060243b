//! Certificate hierarchy issuance for ca-util.
//!
//! This crate turns declarative certificate specs into PEM-encoded key
//! pairs.
//!
//! # Overview
//!
//! - [`CertificateSpec`] describes one node: a root authority or a leaf
//!   grouped under it. [`CertificateSpec::finalize`] fills defaults, parses
//!   the validity offsets and derives the store-entry name.
//! - [`generate`] produces a fresh P-256 key and certificate for one node.
//! - [`expand`] walks a forest of authorities and returns every pair,
//!   authority first.
//!
//! # Example
//!
//! ```
//! use cautil_pki::{expand, finalize_forest, CertificateSpec};
//!
//! let mut specs = vec![
//!     CertificateSpec::authority("Example CA")
//!         .with_signed_cert(CertificateSpec::leaf("api.example.local")),
//! ];
//!
//! let errors = finalize_forest(&mut specs);
//! assert!(errors.is_empty());
//! assert_eq!(specs[0].secret_name, "ExampleCA-tls");
//!
//! let pairs = expand(&specs).unwrap();
//! assert_eq!(pairs.len(), 2);
//! assert!(pairs[0].cert_pem().contains("BEGIN CERTIFICATE"));
//! assert!(pairs[0].key_pem().contains("BEGIN EC PRIVATE KEY"));
//! ```
//!
//! # Modules
//!
//! - [`types`] - Spec model, defaults and key pairs
//! - [`duration`] - Validity offset parsing
//! - [`generate`] - Key pair generation
//! - [`expand`] - Hierarchy expansion
//! - [`inspect`] - Certificate read-back
//! - [`error`] - Error types

#![forbid(unsafe_code)]

pub mod duration;
pub mod error;
pub mod expand;
pub mod generate;
pub mod inspect;
pub mod types;

// Re-export commonly used types at crate root
pub use duration::parse_duration;
pub use error::{Error, Result};
pub use expand::{expand, expand_with, flatten, SigningMode};
pub use generate::{generate, issue, Issued};
pub use inspect::{inspect_der, inspect_pem, CertificateInfo};
pub use types::{derive_secret_name, finalize_forest, CertificateSpec, KeyPair};
