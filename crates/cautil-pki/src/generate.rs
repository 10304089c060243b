//! Key pair generation.
//!
//! Every node gets a fresh NIST P-256 key and a 128-bit random serial. The
//! role decides the extensions: authorities get certificate-signing key
//! usage, leaves get encipher-only. Both declare server authentication as
//! extended key usage.

use chrono::{DateTime, Utc};
use p256::pkcs8::DecodePrivateKey;
use rand::rngs::OsRng;
use rand::RngCore;
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose,
    IsCa, KeyUsagePurpose, SerialNumber, PKCS_ECDSA_P256_SHA256,
};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{CertificateSpec, KeyPair};

/// PEM label for SEC1 elliptic-curve private keys.
const EC_PRIVATE_KEY_TAG: &str = "EC PRIVATE KEY";

/// Serial numbers are drawn uniformly from `[0, 2^128)`.
const SERIAL_BYTES: usize = 16;

/// A generated certificate that can go on to sign others.
///
/// Keeps the rcgen handles alongside the PEM output so the expander can sign
/// children with an authority's key.
pub struct Issued {
    /// The PEM output handed to callers.
    pub pair: KeyPair,
    cert: rcgen::Certificate,
    key: rcgen::KeyPair,
}

impl Issued {
    /// Consumes the issued node, returning its PEM key pair.
    #[must_use]
    pub fn into_pair(self) -> KeyPair {
        self.pair
    }
}

impl std::fmt::Debug for Issued {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Issued")
            .field("pair", &self.pair)
            .field("key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Generates a self-signed key pair for a finalized spec.
///
/// The certificate names itself as issuer whatever its role.
///
/// # Errors
///
/// Returns an error if the spec is not finalized, or if randomness, key
/// generation or encoding fails.
pub fn generate(spec: &CertificateSpec) -> Result<KeyPair> {
    issue(spec, None).map(Issued::into_pair)
}

/// Generates a key pair, signing with `issuer` when one is given.
///
/// Without an issuer the certificate is self-signed. With one, the
/// certificate's issuer is the authority's subject and the signature comes
/// from the authority's key.
///
/// # Errors
///
/// Returns an error if the spec is not finalized, or if randomness, key
/// generation, signing or encoding fails.
pub fn issue(spec: &CertificateSpec, issuer: Option<&Issued>) -> Result<Issued> {
    let (not_before, not_after) = spec
        .validity()
        .ok_or_else(|| Error::NotFinalized(spec.common_name.clone()))?;

    let serial = random_serial()?;

    let key = rcgen::KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256)
        .map_err(|e| Error::KeyGeneration(format!("failed to generate P-256 key: {e}")))?;
    let key_pem = sec1_pem(&key)?;

    let mut params = CertificateParams::default();
    params.serial_number = Some(serial);

    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, spec.organization.as_str());
    dn.push(DnType::CommonName, spec.common_name.as_str());
    params.distinguished_name = dn;

    params.not_before = to_rcgen_time(not_before)?;
    params.not_after = to_rcgen_time(not_after)?;

    params.is_ca = if spec.is_ca {
        IsCa::Ca(BasicConstraints::Unconstrained)
    } else {
        IsCa::ExplicitNoCa
    };
    params.key_usages = key_usages(spec.is_ca);
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];

    let cert = match issuer {
        Some(parent) => params
            .signed_by(&key, &parent.cert, &parent.key)
            .map_err(|e| Error::Generation(format!("failed to sign certificate: {e}")))?,
        None => params
            .self_signed(&key)
            .map_err(|e| Error::Generation(format!("failed to self-sign certificate: {e}")))?,
    };

    debug!(
        common_name = %spec.common_name,
        is_ca = spec.is_ca,
        chained = issuer.is_some(),
        "certificate generated"
    );

    Ok(Issued {
        pair: KeyPair::new(cert.pem(), key_pem),
        cert,
        key,
    })
}

/// Key usage by role: authorities sign certificates, leaves are
/// encipher-only. Every certificate also carries the server-auth EKU.
fn key_usages(is_ca: bool) -> Vec<KeyUsagePurpose> {
    if is_ca {
        vec![KeyUsagePurpose::KeyCertSign]
    } else {
        vec![KeyUsagePurpose::EncipherOnly]
    }
}

fn random_serial() -> Result<SerialNumber> {
    let mut bytes = [0u8; SERIAL_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| Error::Random(e.to_string()))?;
    Ok(SerialNumber::from_slice(&bytes))
}

/// Re-encodes rcgen's PKCS#8 key as a SEC1 `EC PRIVATE KEY` PEM block.
fn sec1_pem(key: &rcgen::KeyPair) -> Result<String> {
    let secret = p256::SecretKey::from_pkcs8_der(&key.serialize_der())
        .map_err(|e| Error::Encoding(format!("failed to decode generated key: {e}")))?;
    let der = secret
        .to_sec1_der()
        .map_err(|e| Error::Encoding(format!("failed to encode SEC1 key: {e}")))?;

    let block = pem::Pem::new(EC_PRIVATE_KEY_TAG, der.to_vec());
    let config = pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF);
    Ok(pem::encode_config(&block, config))
}

/// Converts a chrono `DateTime` to rcgen `OffsetDateTime`.
fn to_rcgen_time(dt: DateTime<Utc>) -> Result<time::OffsetDateTime> {
    time::OffsetDateTime::from_unix_timestamp(dt.timestamp())
        .map_err(|e| Error::Generation(format!("invalid timestamp: {e}")))
}
