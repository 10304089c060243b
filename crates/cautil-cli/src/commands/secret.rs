//! `secret NAME`: provision the fixed root CA into one named secret.

use std::io::Write;
use std::path::Path;

use cautil_secrets::{DirSecretStore, Reconciler};

use crate::cli::SecretArgs;
use crate::error::CliError;
use crate::output::{IssuedCert, OutputFormat, RootCaReport};

/// Handler for `secret`.
pub struct SecretCommand<'a> {
    store_dir: &'a Path,
}

impl<'a> SecretCommand<'a> {
    /// Creates a new handler using the store at `store_dir`.
    #[must_use]
    pub const fn new(store_dir: &'a Path) -> Self {
        Self { store_dir }
    }

    /// Creates the root CA secret unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, generation fails, or the
    /// store cannot be read or written.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &SecretArgs,
    ) -> Result<(), CliError> {
        let reconciler = Reconciler::new(DirSecretStore::new(self.store_dir));
        let created = reconciler.provision_root_ca(&args.namespace, &args.name)?;

        let certificate = created.as_ref().map(IssuedCert::from_pair).transpose()?;
        let report = RootCaReport {
            name: args.name.clone(),
            namespace: args.namespace.clone(),
            created: certificate.is_some(),
            certificate,
        };

        format.write(out, &report)
    }
}
