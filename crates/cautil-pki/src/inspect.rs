//! Read-back of issued certificates for display.

use chrono::{DateTime, Utc};
use serde::Serialize;
use x509_parser::prelude::*;

use crate::error::{Error, Result};

/// Summary of a PEM certificate's subject, issuer, window and extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateInfo {
    /// Subject common name.
    pub common_name: String,
    /// Subject organization, if present.
    pub organization: Option<String>,
    /// Issuer common name.
    pub issuer_common_name: String,
    /// Serial number as colon-separated hex.
    pub serial: String,
    /// Validity start.
    pub not_before: DateTime<Utc>,
    /// Validity end.
    pub not_after: DateTime<Utc>,
    /// Whether the basic constraints extension is present.
    pub basic_constraints_present: bool,
    /// The CA flag of basic constraints.
    pub is_ca: bool,
    /// Key usage permits certificate signing.
    pub key_cert_sign: bool,
    /// Key usage is encipher-only.
    pub encipher_only: bool,
    /// Extended key usage includes server authentication.
    pub server_auth: bool,
}

/// Parses a PEM certificate into a [`CertificateInfo`].
///
/// # Errors
///
/// Returns [`Error::Parse`] if the PEM framing, DER or an extension is malformed.
pub fn inspect_pem(cert_pem: &str) -> Result<CertificateInfo> {
    let block = ::pem::parse(cert_pem.as_bytes())
        .map_err(|e| Error::Parse(format!("failed to parse PEM: {e}")))?;
    inspect_der(block.contents())
}

/// Parses a DER certificate into a [`CertificateInfo`].
///
/// # Errors
///
/// Returns [`Error::Parse`] if the DER or an extension is malformed.
pub fn inspect_der(der: &[u8]) -> Result<CertificateInfo> {
    let (_, cert) = X509Certificate::from_der(der)
        .map_err(|e| Error::Parse(format!("failed to parse certificate: {e}")))?;

    let not_before = DateTime::from_timestamp(cert.validity().not_before.timestamp(), 0)
        .ok_or_else(|| Error::Parse("invalid not_before timestamp".into()))?;
    let not_after = DateTime::from_timestamp(cert.validity().not_after.timestamp(), 0)
        .ok_or_else(|| Error::Parse("invalid not_after timestamp".into()))?;

    let basic_constraints = cert
        .basic_constraints()
        .map_err(|e| Error::Parse(format!("invalid basic constraints: {e}")))?;
    let key_usage = cert
        .key_usage()
        .map_err(|e| Error::Parse(format!("invalid key usage: {e}")))?;
    let extended_key_usage = cert
        .extended_key_usage()
        .map_err(|e| Error::Parse(format!("invalid extended key usage: {e}")))?;

    Ok(CertificateInfo {
        common_name: first_attr(cert.subject().iter_common_name())
            .ok_or_else(|| Error::Parse("common name not found".into()))?,
        organization: first_attr(cert.subject().iter_organization()),
        issuer_common_name: first_attr(cert.issuer().iter_common_name())
            .ok_or_else(|| Error::Parse("issuer common name not found".into()))?,
        serial: cert.raw_serial_as_string(),
        not_before,
        not_after,
        basic_constraints_present: basic_constraints.is_some(),
        is_ca: basic_constraints.as_ref().is_some_and(|bc| bc.value.ca),
        key_cert_sign: key_usage.as_ref().is_some_and(|ku| ku.value.key_cert_sign()),
        encipher_only: key_usage.as_ref().is_some_and(|ku| ku.value.encipher_only()),
        server_auth: extended_key_usage.is_some_and(|eku| eku.value.server_auth),
    })
}

fn first_attr<'a, 'b: 'a>(
    mut attrs: impl Iterator<Item = &'a AttributeTypeAndValue<'b>>,
) -> Option<String> {
    attrs.next().and_then(|attr| attr.as_str().ok()).map(String::from)
}
