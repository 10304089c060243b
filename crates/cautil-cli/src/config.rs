//! Config file loading.
//!
//! A config file lists certificate authorities, each with the certs it
//! signs:
//!
//! ```yaml
//! certAuthorities:
//!   - commonName: My Root CA
//!     organization: Example Org
//!     validForDuration: 43800h
//!     signedCerts:
//!       - commonName: api.example.com
//!         dnsNames: [api.example.com]
//! ```
//!
//! Files ending in `.toml` are parsed as TOML with the same keys; anything
//! else is parsed as YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cautil_pki::{finalize_forest, CertificateSpec};

use crate::error::CliError;

/// Parsed ca-util config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaUtilConfig {
    /// Top-level authorities, in file order.
    #[serde(default)]
    pub cert_authorities: Vec<CertificateSpec>,
}

impl CaUtilConfig {
    /// Load configuration from a file, choosing the parser by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn from_yaml(content: &str) -> Result<Self, CliError> {
        // An empty document means an empty config.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| CliError::Config(format!("invalid YAML: {e}")))
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        toml::from_str(content).map_err(|e| CliError::Config(format!("invalid TOML: {e}")))
    }

    /// Returns true if no authorities are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cert_authorities.is_empty()
    }

    /// Marks top-level entries as authorities and their children as leaves,
    /// then finalizes every node.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Validation`] carrying every message collected
    /// across the whole forest.
    pub fn prepare(&mut self) -> Result<(), CliError> {
        let errors = finalize_forest(&mut self.cert_authorities);
        if !errors.is_empty() {
            return Err(CliError::Validation(errors));
        }

        debug!(
            authorities = self.cert_authorities.len(),
            "config validated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML: &str = r"
certAuthorities:
  - commonName: My Root CA
    organization: Example Org
    validForDuration: 43800h
    signedCerts:
      - commonName: api.example.com
        dnsNames:
          - api.example.com
          - api.internal
      - commonName: web
  - commonName: Second CA
";

    fn create_temp_config(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("failed to write temp file");
        file
    }

    #[test]
    fn parse_yaml_config() {
        let config = CaUtilConfig::from_yaml(YAML).expect("should parse");

        assert_eq!(config.cert_authorities.len(), 2);
        let root = &config.cert_authorities[0];
        assert_eq!(root.common_name, "My Root CA");
        assert_eq!(root.organization, "Example Org");
        assert_eq!(root.valid_for_duration, "43800h");
        assert_eq!(root.signed_certs.len(), 2);
        assert_eq!(
            root.signed_certs[0].dns_names,
            vec!["api.example.com", "api.internal"]
        );
        assert!(config.cert_authorities[1].signed_certs.is_empty());
    }

    #[test]
    fn parse_toml_config() {
        let toml = r#"
            [[certAuthorities]]
            commonName = "Toml CA"

            [[certAuthorities.signedCerts]]
            commonName = "leaf"
            dnsNames = ["leaf.local"]
        "#;

        let config = CaUtilConfig::from_toml(toml).expect("should parse");
        assert_eq!(config.cert_authorities[0].common_name, "Toml CA");
        assert_eq!(config.cert_authorities[0].signed_certs[0].dns_names, vec!["leaf.local"]);
    }

    #[test]
    fn from_file_picks_parser_by_extension() {
        let yaml = create_temp_config(".yaml", YAML);
        let config = CaUtilConfig::from_file(yaml.path()).expect("yaml");
        assert_eq!(config.cert_authorities.len(), 2);

        let toml = create_temp_config(".toml", "[[certAuthorities]]\ncommonName = \"t\"\n");
        let config = CaUtilConfig::from_file(toml.path()).expect("toml");
        assert_eq!(config.cert_authorities[0].common_name, "t");
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = CaUtilConfig::from_file("/nonexistent/ca-util.yaml").unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("failed to read")));
    }

    #[test]
    fn invalid_yaml_is_config_error() {
        let err = CaUtilConfig::from_yaml("certAuthorities: [").unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.starts_with("invalid YAML")));
    }

    #[test]
    fn empty_document_is_empty_config() {
        assert!(CaUtilConfig::from_yaml("").unwrap().is_empty());
        assert!(CaUtilConfig::from_yaml("certAuthorities: []").unwrap().is_empty());
    }

    #[test]
    fn prepare_forces_ca_flags_and_finalizes() {
        let mut config = CaUtilConfig::from_yaml(YAML).unwrap();
        config.prepare().expect("valid");

        let root = &config.cert_authorities[0];
        assert!(root.is_ca);
        assert_eq!(root.secret_name, "MyRootCA-tls");
        assert!(root.validity().is_some());

        for child in &root.signed_certs {
            assert!(!child.is_ca);
            assert!(child.validity().is_some());
        }
        assert_eq!(root.signed_certs[0].secret_name, "api.example.com-tls");
    }

    #[test]
    fn prepare_overrides_is_ca_from_file() {
        let yaml = r"
certAuthorities:
  - commonName: root
    isCa: false
    signedCerts:
      - commonName: child
        isCa: true
";
        let mut config = CaUtilConfig::from_yaml(yaml).unwrap();
        config.prepare().unwrap();

        assert!(config.cert_authorities[0].is_ca);
        assert!(!config.cert_authorities[0].signed_certs[0].is_ca);
    }

    #[test]
    fn prepare_collects_errors_across_forest() {
        let yaml = r"
certAuthorities:
  - commonName: ''
    signedCerts:
      - commonName: child
        validForDuration: forever
  - commonName: fine
";
        let mut config = CaUtilConfig::from_yaml(yaml).unwrap();
        let err = config.prepare().unwrap_err();

        let CliError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("commonName is required"));
        assert!(errors[1].contains("validForDuration"));
    }
}
