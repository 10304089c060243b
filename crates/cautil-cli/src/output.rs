//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use cautil_pki::{derive_secret_name, inspect_pem, CertificateInfo, KeyPair};

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Where an issued certificate ended up.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Placement {
    /// PEM certificate, when printed rather than stored or written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_pem: Option<String>,
    /// PEM private key, when printed rather than stored or written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_pem: Option<String>,
    /// Certificate file, when written to an output directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<PathBuf>,
    /// Key file, when written to an output directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,
}

/// One issued certificate.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedCert {
    /// Store-entry name derived from the common name.
    pub secret_name: String,
    /// Subject common name.
    pub common_name: String,
    /// Subject organization.
    pub organization: Option<String>,
    /// Issuer common name.
    pub issuer: String,
    /// Whether the certificate is an authority.
    pub is_ca: bool,
    /// Serial number, hex.
    pub serial: String,
    /// Validity start.
    pub not_before: DateTime<Utc>,
    /// Validity end.
    pub not_after: DateTime<Utc>,
    /// Printed PEMs or written file paths.
    #[serde(flatten)]
    pub placement: Placement,
}

impl IssuedCert {
    /// Summarizes a freshly generated key pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the certificate cannot be parsed back.
    pub fn from_pair(pair: &KeyPair) -> Result<Self, CliError> {
        let info = inspect_pem(pair.cert_pem())?;
        Ok(Self::from_info(info))
    }

    fn from_info(info: CertificateInfo) -> Self {
        Self {
            secret_name: derive_secret_name(&info.common_name),
            common_name: info.common_name,
            organization: info.organization,
            issuer: info.issuer_common_name,
            is_ca: info.is_ca,
            serial: info.serial,
            not_before: info.not_before,
            not_after: info.not_after,
            placement: Placement::default(),
        }
    }

    /// Attaches where the certificate was placed.
    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}

/// Result of a `create` run.
#[derive(Debug, Clone, Serialize)]
pub struct IssueReport {
    /// Namespace the secrets went to, when storing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Certificates issued by this run, in issuance order.
    pub issued: Vec<IssuedCert>,
    /// Specs skipped because their secret already existed.
    pub skipped: usize,
}

impl TableDisplay for IssueReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.issued.is_empty() {
            match &self.namespace {
                Some(ns) => writeln!(
                    writer,
                    "All {} secret(s) already exist in namespace '{ns}'",
                    self.skipped
                )?,
                None => writeln!(writer, "No certificates issued")?,
            }
            return Ok(());
        }

        writeln!(
            writer,
            "{:<32}  {:<24}  {:<3}  {:<24}  {:<20}",
            "SECRET", "COMMON NAME", "CA", "ISSUER", "NOT AFTER"
        )?;
        writeln!(writer, "{}", "─".repeat(111))?;

        for cert in &self.issued {
            writeln!(
                writer,
                "{:<32}  {:<24}  {:<3}  {:<24}  {:<20}",
                truncate(&cert.secret_name, 32),
                truncate(&cert.common_name, 24),
                if cert.is_ca { "yes" } else { "no" },
                truncate(&cert.issuer, 24),
                cert.not_after.format("%Y-%m-%d %H:%M:%S")
            )?;
        }

        writeln!(writer)?;
        match &self.namespace {
            Some(ns) => writeln!(
                writer,
                "Created {} secret(s) in namespace '{ns}', {} already present",
                self.issued.len(),
                self.skipped
            )?,
            None => writeln!(writer, "Generated {} certificate(s)", self.issued.len())?,
        }

        for cert in &self.issued {
            let placement = &cert.placement;
            if let (Some(cert_file), Some(key_file)) = (&placement.cert_file, &placement.key_file)
            {
                writeln!(
                    writer,
                    "  {}: {} {}",
                    cert.secret_name,
                    cert_file.display(),
                    key_file.display()
                )?;
            }
            if let (Some(cert_pem), Some(key_pem)) = (&placement.cert_pem, &placement.key_pem) {
                writeln!(writer)?;
                writeln!(writer, "# {}", cert.secret_name)?;
                write!(writer, "{cert_pem}{key_pem}")?;
            }
        }
        Ok(())
    }
}

/// Result of `secret NAME`.
#[derive(Debug, Clone, Serialize)]
pub struct RootCaReport {
    /// Secret name.
    pub name: String,
    /// Namespace.
    pub namespace: String,
    /// Whether this run created the secret.
    pub created: bool,
    /// The root CA, when created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<IssuedCert>,
}

impl TableDisplay for RootCaReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if !self.created {
            writeln!(
                writer,
                "Secret '{}' already exists in namespace '{}'",
                self.name, self.namespace
            )?;
            return Ok(());
        }

        writeln!(
            writer,
            "Secret '{}' created in namespace '{}'",
            self.name, self.namespace
        )?;
        if let Some(cert) = &self.certificate {
            writeln!(writer, "  Subject:    CN={}", cert.common_name)?;
            if let Some(org) = &cert.organization {
                writeln!(writer, "  Org:        {org}")?;
            }
            writeln!(writer, "  Serial:     {}", cert.serial)?;
            writeln!(writer, "  Not Before: {}", cert.not_before.to_rfc3339())?;
            writeln!(writer, "  Not After:  {}", cert.not_after.to_rfc3339())?;
        }
        Ok(())
    }
}

/// Truncate a string to a maximum number of characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
