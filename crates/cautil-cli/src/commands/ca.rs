//! `create ca`: a single self-signed authority.

use std::io::Write;
use std::path::Path;

use cautil_pki::{generate, CertificateSpec};

use crate::cli::CaArgs;
use crate::error::CliError;
use crate::output::OutputFormat;

use super::{local_report, store_specs};

/// Handler for `create ca`.
pub struct CaCommand<'a> {
    store_dir: &'a Path,
}

impl<'a> CaCommand<'a> {
    /// Creates a new handler using the store at `store_dir`.
    #[must_use]
    pub const fn new(store_dir: &'a Path) -> Self {
        Self { store_dir }
    }

    /// Creates the authority, storing it as a secret if `args.store` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the spec is invalid, generation fails, or the
    /// store rejects the write.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &CaArgs,
    ) -> Result<(), CliError> {
        let mut spec = CertificateSpec::authority(&args.common_name);
        let errors = spec.finalize();
        if !errors.is_empty() {
            return Err(CliError::Validation(errors));
        }

        let report = if args.store {
            store_specs(self.store_dir, args.namespace(), &[&spec])?
        } else {
            local_report(&[generate(&spec)?], None)?
        };

        format.write(out, &report)
    }
}
