//! Core types: the certificate spec model and issued key pairs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::duration::parse_duration;

/// Organization used when a spec leaves it empty.
pub const DEFAULT_ORGANIZATION: &str = "My Org";

/// Default validity-start offset: certificates become valid a day before issuance.
pub const DEFAULT_VALID_SINCE: &str = "24h";

/// Default validity-end offset: ten years after issuance.
pub const DEFAULT_VALID_FOR: &str = "87600h";

/// Suffix appended to the store-entry name derived from a common name.
pub const SECRET_NAME_SUFFIX: &str = "-tls";

/// Organization of the fixed root authority provisioned by name.
pub const ROOT_CA_ORGANIZATION: &str = "k8s cluster";

/// Common name of the fixed root authority provisioned by name.
pub const ROOT_CA_COMMON_NAME: &str = "Root CA";

/// Validity of the fixed root authority, in days.
pub const ROOT_CA_VALIDITY_DAYS: i64 = 3650;

/// Derives the store-entry name for a common name.
///
/// Spaces are removed and [`SECRET_NAME_SUFFIX`] is appended, so
/// `"My Cert"` becomes `"MyCert-tls"`. Anything looking up an entry created
/// by this crate must apply the same transformation.
#[must_use]
pub fn derive_secret_name(common_name: &str) -> String {
    format!("{}{SECRET_NAME_SUFFIX}", common_name.replace(' ', ""))
}

/// One node of a certificate hierarchy.
///
/// Authorities may carry `signed_certs`, the leaves grouped under them.
/// User-supplied fields may be left empty; [`CertificateSpec::finalize`]
/// fills defaults and resolves the validity window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateSpec {
    /// Subject organization.
    pub organization: String,
    /// Subject common name. Required.
    pub common_name: String,
    /// How long before issuance the certificate becomes valid.
    pub valid_since_duration: String,
    /// How long after issuance the certificate stays valid.
    pub valid_for_duration: String,
    /// DNS subject alternative names. Retained, not emitted.
    pub dns_names: Vec<String>,
    /// Leaves grouped under this authority.
    pub signed_certs: Vec<CertificateSpec>,
    /// Whether this node is a certificate authority.
    pub is_ca: bool,
    /// Resolved validity start.
    #[serde(skip)]
    pub not_before: Option<DateTime<Utc>>,
    /// Resolved validity end.
    #[serde(skip)]
    pub not_after: Option<DateTime<Utc>>,
    /// Derived store-entry name.
    #[serde(skip)]
    pub secret_name: String,
}

impl CertificateSpec {
    /// Creates a leaf spec with the given common name.
    #[must_use]
    pub fn leaf(common_name: impl Into<String>) -> Self {
        Self {
            common_name: common_name.into(),
            ..Self::default()
        }
    }

    /// Creates an authority spec with the given common name.
    #[must_use]
    pub fn authority(common_name: impl Into<String>) -> Self {
        Self {
            common_name: common_name.into(),
            is_ca: true,
            ..Self::default()
        }
    }

    /// Sets the organization.
    #[must_use]
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    /// Sets the validity-start offset.
    #[must_use]
    pub fn with_valid_since(mut self, duration: impl Into<String>) -> Self {
        self.valid_since_duration = duration.into();
        self
    }

    /// Sets the validity-end offset.
    #[must_use]
    pub fn with_valid_for(mut self, duration: impl Into<String>) -> Self {
        self.valid_for_duration = duration.into();
        self
    }

    /// Adds a DNS subject alternative name.
    #[must_use]
    pub fn with_dns(mut self, dns: impl Into<String>) -> Self {
        self.dns_names.push(dns.into());
        self
    }

    /// Adds a leaf signed by this node.
    #[must_use]
    pub fn with_signed_cert(mut self, child: Self) -> Self {
        self.signed_certs.push(child);
        self
    }

    /// The fixed ten-year root authority provisioned into a named entry.
    ///
    /// Unlike user specs its window starts at `now` rather than a day earlier.
    #[must_use]
    pub fn root_authority(now: DateTime<Utc>) -> Self {
        Self {
            organization: ROOT_CA_ORGANIZATION.to_string(),
            common_name: ROOT_CA_COMMON_NAME.to_string(),
            is_ca: true,
            not_before: Some(now),
            not_after: Some(now + Duration::days(ROOT_CA_VALIDITY_DAYS)),
            secret_name: derive_secret_name(ROOT_CA_COMMON_NAME),
            ..Self::default()
        }
    }

    /// Fills defaults and resolves the validity window relative to now.
    ///
    /// Returns every problem found; an empty list means the spec is ready
    /// for issuance.
    pub fn finalize(&mut self) -> Vec<String> {
        self.finalize_at(Utc::now())
    }

    /// Same as [`CertificateSpec::finalize`] with an explicit issuance time.
    ///
    /// Defaults are applied in order (organization, validity start, validity
    /// end) and a failure in one field never stops processing of the rest.
    pub fn finalize_at(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let mut errors = Vec::new();

        if self.common_name.is_empty() {
            errors.push(format!("commonName is required for cert: {self:?}"));
        }

        debug!(common_name = %self.common_name, "validating certificate spec");

        if self.organization.is_empty() {
            self.organization = DEFAULT_ORGANIZATION.to_string();
        }

        if self.valid_since_duration.is_empty() {
            self.valid_since_duration = DEFAULT_VALID_SINCE.to_string();
        }
        match parse_duration(&self.valid_since_duration) {
            Ok(offset) => self.not_before = Some(now - offset),
            Err(e) => errors.push(format!(
                "failed to parse validSinceDuration ({}) for cert '{}': {e}",
                self.valid_since_duration, self.common_name
            )),
        }

        if self.valid_for_duration.is_empty() {
            self.valid_for_duration = DEFAULT_VALID_FOR.to_string();
        }
        match parse_duration(&self.valid_for_duration) {
            Ok(offset) => self.not_after = Some(now + offset),
            Err(e) => errors.push(format!(
                "failed to parse validForDuration ({}) for cert '{}': {e}",
                self.valid_for_duration, self.common_name
            )),
        }

        self.secret_name = derive_secret_name(&self.common_name);

        errors
    }

    /// Returns the resolved validity window, if finalized.
    #[must_use]
    pub fn validity(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.not_before?, self.not_after?))
    }
}

/// Prepares a forest of specs for issuance.
///
/// Top-level specs become authorities and their children leaves; children of
/// children are never promoted. Every node is finalized and all errors are
/// returned together.
pub fn finalize_forest(specs: &mut [CertificateSpec]) -> Vec<String> {
    let now = Utc::now();
    let mut errors = Vec::new();

    for ca in specs.iter_mut() {
        ca.is_ca = true;
        errors.extend(ca.finalize_at(now));

        for child in &mut ca.signed_certs {
            child.is_ca = false;
            errors.extend(child.finalize_at(now));
        }
    }

    errors
}

/// A PEM-encoded certificate and its PEM-encoded private key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    cert_pem: String,
    key_pem: String,
}

impl KeyPair {
    /// Creates a key pair from PEM strings.
    #[must_use]
    pub const fn new(cert_pem: String, key_pem: String) -> Self {
        Self { cert_pem, key_pem }
    }

    /// Returns the PEM-encoded certificate.
    #[must_use]
    pub fn cert_pem(&self) -> &str {
        &self.cert_pem
    }

    /// Returns the PEM-encoded SEC1 private key.
    #[must_use]
    pub fn key_pem(&self) -> &str {
        &self.key_pem
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("cert_pem", &self.cert_pem)
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn tolerance() -> Duration {
        Duration::seconds(5)
    }

    #[test_case("My Cert", "MyCert-tls" ; "single space")]
    #[test_case("Example Org", "ExampleOrg-tls" ; "example org")]
    #[test_case("a b  c", "abc-tls" ; "repeated spaces")]
    #[test_case("plain", "plain-tls" ; "no spaces")]
    #[test_case("", "-tls" ; "empty")]
    fn derives_secret_name(common_name: &str, expected: &str) {
        assert_eq!(derive_secret_name(common_name), expected);
    }

    #[test]
    fn defaults_resolve_window_around_now() {
        let mut spec = CertificateSpec::leaf("svc");
        let errors = spec.finalize();
        let now = Utc::now();

        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(spec.organization, DEFAULT_ORGANIZATION);
        assert_eq!(spec.valid_since_duration, DEFAULT_VALID_SINCE);
        assert_eq!(spec.valid_for_duration, DEFAULT_VALID_FOR);

        let (not_before, not_after) = spec.validity().unwrap();
        assert!((not_before - (now - Duration::hours(24))).abs() < tolerance());
        assert!((not_after - (now + Duration::hours(87_600))).abs() < tolerance());
        assert!(not_before < not_after);
    }

    #[test]
    fn explicit_values_are_kept() {
        let now = Utc::now();
        let mut spec = CertificateSpec::leaf("svc")
            .with_organization("Acme")
            .with_valid_since("1h")
            .with_valid_for("720h");

        assert!(spec.finalize_at(now).is_empty());
        assert_eq!(spec.organization, "Acme");
        assert_eq!(spec.not_before, Some(now - Duration::hours(1)));
        assert_eq!(spec.not_after, Some(now + Duration::hours(720)));
    }

    #[test]
    fn missing_common_name_is_one_error_and_defaults_still_apply() {
        let mut spec = CertificateSpec::default();
        let errors = spec.finalize();

        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("commonName"));
        assert_eq!(spec.organization, DEFAULT_ORGANIZATION);
        assert!(spec.validity().is_some());
        assert_eq!(spec.secret_name, "-tls");
    }

    #[test]
    fn bad_durations_are_collected_not_short_circuited() {
        let mut spec = CertificateSpec::default()
            .with_valid_since("yesterday")
            .with_valid_for("forever");
        let errors = spec.finalize();

        assert_eq!(errors.len(), 3);
        assert!(errors[1].contains("validSinceDuration"));
        assert!(errors[2].contains("validForDuration"));
        assert!(spec.not_before.is_none());
        assert!(spec.not_after.is_none());
        assert_eq!(spec.organization, DEFAULT_ORGANIZATION);
    }

    #[test]
    fn finalize_derives_secret_name() {
        let mut spec = CertificateSpec::authority("Example Org");
        spec.finalize();
        assert_eq!(spec.secret_name, "ExampleOrg-tls");
    }

    #[test]
    fn forest_forces_roles() {
        let mut forest = vec![
            CertificateSpec::leaf("root")
                .with_signed_cert(CertificateSpec::authority("child")),
        ];

        let errors = finalize_forest(&mut forest);

        assert!(errors.is_empty());
        assert!(forest[0].is_ca);
        assert!(!forest[0].signed_certs[0].is_ca);
    }

    #[test]
    fn forest_collects_errors_from_every_node() {
        let mut forest = vec![
            CertificateSpec::authority("").with_signed_cert(CertificateSpec::leaf("")),
            CertificateSpec::authority("ok").with_valid_for("nope"),
        ];

        assert_eq!(finalize_forest(&mut forest).len(), 3);
    }

    #[test]
    fn root_authority_is_ten_years_from_now() {
        let now = Utc::now();
        let spec = CertificateSpec::root_authority(now);

        assert!(spec.is_ca);
        assert_eq!(spec.organization, ROOT_CA_ORGANIZATION);
        assert_eq!(spec.common_name, ROOT_CA_COMMON_NAME);
        assert_eq!(spec.validity(), Some((now, now + Duration::days(3650))));
    }

    #[test]
    fn spec_deserializes_camel_case() {
        let json = r#"{
            "commonName": "My CA",
            "validForDuration": "8760h",
            "signedCerts": [{ "commonName": "leaf", "dnsNames": ["leaf.local"] }]
        }"#;
        let spec: CertificateSpec = serde_json::from_str(json).unwrap();

        assert_eq!(spec.common_name, "My CA");
        assert_eq!(spec.valid_for_duration, "8760h");
        assert_eq!(spec.signed_certs.len(), 1);
        assert_eq!(spec.signed_certs[0].dns_names, vec!["leaf.local"]);
        assert!(spec.not_before.is_none());
    }

    #[test]
    fn key_pair_debug_redacts_key() {
        let pair = KeyPair::new("cert".into(), "super-secret".into());
        let debug = format!("{pair:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("super-secret"));
    }

    proptest! {
        #[test]
        fn secret_name_is_deterministic_and_space_free(cn in "[ a-zA-Z0-9.-]{0,32}") {
            let first = derive_secret_name(&cn);
            prop_assert_eq!(&first, &derive_secret_name(&cn));
            prop_assert!(!first.contains(' '));
            prop_assert!(first.ends_with(SECRET_NAME_SUFFIX));
        }
    }
}
