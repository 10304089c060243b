//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`create`] - Config-driven hierarchy generation or reconciliation
//! - [`ca`] - Single authority (`create ca`)
//! - [`secret`] - Fixed root CA provisioning by secret name

pub mod ca;
pub mod create;
pub mod secret;

pub use ca::CaCommand;
pub use create::CreateCommand;
pub use secret::SecretCommand;

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use cautil_pki::{CertificateSpec, KeyPair};
use cautil_secrets::{DirSecretStore, Reconciler};

use crate::error::CliError;
use crate::output::{IssueReport, IssuedCert, Placement};

/// Reconciles finalized specs into the directory store at `store_dir`.
fn store_specs(
    store_dir: &Path,
    namespace: &str,
    specs: &[&CertificateSpec],
) -> Result<IssueReport, CliError> {
    let reconciler = Reconciler::new(DirSecretStore::new(store_dir));
    let created = reconciler.reconcile(namespace, specs)?;

    let issued = created
        .iter()
        .map(IssuedCert::from_pair)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(IssueReport {
        namespace: Some(namespace.to_string()),
        skipped: specs.len() - issued.len(),
        issued,
    })
}

/// Reports locally generated pairs, writing them to `out_dir` if given and
/// embedding the PEMs otherwise.
///
/// With `out_dir`, two certificates sharing a secret name would share file
/// names, so that is rejected before anything is written.
fn local_report(pairs: &[KeyPair], out_dir: Option<&Path>) -> Result<IssueReport, CliError> {
    let certs = pairs
        .iter()
        .map(IssuedCert::from_pair)
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(dir) = out_dir {
        let mut seen = HashSet::new();
        for cert in &certs {
            if !seen.insert(cert.secret_name.as_str()) {
                return Err(CliError::InvalidArgument(format!(
                    "more than one certificate is named '{}', their files in '{}' would collide",
                    cert.secret_name,
                    dir.display()
                )));
            }
        }
        fs::create_dir_all(dir)?;
    }

    let mut issued = Vec::with_capacity(certs.len());
    for (cert, pair) in certs.into_iter().zip(pairs) {
        let placement = match out_dir {
            Some(dir) => {
                let cert_file = dir.join(format!("{}.crt", cert.secret_name));
                let key_file = dir.join(format!("{}.key", cert.secret_name));
                fs::write(&cert_file, pair.cert_pem())?;
                write_private(&key_file, pair.key_pem())?;
                info!(
                    cert = %cert_file.display(),
                    key = %key_file.display(),
                    "wrote key pair"
                );
                Placement {
                    cert_file: Some(cert_file),
                    key_file: Some(key_file),
                    ..Placement::default()
                }
            }
            None => Placement {
                cert_pem: Some(pair.cert_pem().to_string()),
                key_pem: Some(pair.key_pem().to_string()),
                ..Placement::default()
            },
        };

        issued.push(cert.with_placement(placement));
    }

    Ok(IssueReport {
        namespace: None,
        issued,
        skipped: 0,
    })
}

/// Writes a file readable only by the owner where the platform allows it.
///
/// An existing file is truncated and narrowed to owner-only as well.
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}
