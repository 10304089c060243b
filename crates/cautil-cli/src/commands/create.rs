//! `create`: generate a certificate hierarchy from a config file.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use cautil_pki::{expand_with, flatten, SigningMode};

use crate::cli::{CaArgs, CreateArgs, CreateCommands};
use crate::config::CaUtilConfig;
use crate::error::CliError;
use crate::output::OutputFormat;

use super::{local_report, store_specs, CaCommand};

/// Handler for `create` and its subcommands.
pub struct CreateCommand<'a> {
    store_dir: &'a Path,
}

impl<'a> CreateCommand<'a> {
    /// Creates a new handler using the store at `store_dir`.
    #[must_use]
    pub const fn new(store_dir: &'a Path) -> Self {
        Self { store_dir }
    }

    /// Executes `create`.
    ///
    /// With `--config`, every spec is validated before anything is issued.
    /// Then the hierarchy is either expanded locally (printed, or written to
    /// `--out-dir`) or reconciled into the store with `--store`.
    ///
    /// # Errors
    ///
    /// Returns an error on bad arguments, an unreadable or invalid config,
    /// or the first generation or store failure.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &CreateArgs,
    ) -> Result<(), CliError> {
        if let Some(CreateCommands::Ca(ca)) = &args.command {
            if args.config.is_some() {
                return Err(CliError::InvalidArgument(
                    "--config should not be used with 'create ca', to create a bundle with a \
                     config file, use 'ca-util create --config myfile.yaml'"
                        .to_string(),
                ));
            }
            let ca = CaArgs {
                store: ca.store || args.store,
                namespace: ca.namespace.clone().or_else(|| Some(args.namespace.clone())),
                ..ca.clone()
            };
            return CaCommand::new(self.store_dir).execute(out, format, &ca);
        }

        let Some(path) = &args.config else {
            return Err(CliError::InvalidArgument(
                "must specify a sub-command or provide a config file with --config".to_string(),
            ));
        };

        let mut config = CaUtilConfig::from_file(path)?;
        if config.is_empty() {
            return Err(CliError::Config(format!(
                "config file '{}' lists no certAuthorities",
                path.display()
            )));
        }
        config.prepare()?;

        let report = if args.store {
            let specs = flatten(&config.cert_authorities);
            debug!(count = specs.len(), namespace = %args.namespace, "reconciling secrets");
            store_specs(self.store_dir, &args.namespace, &specs)?
        } else {
            let mode = if args.chain {
                SigningMode::Chained
            } else {
                SigningMode::SelfSigned
            };
            let pairs = expand_with(&config.cert_authorities, mode)?;
            local_report(&pairs, args.out_dir.as_deref())?
        };

        format.write(out, &report)
    }
}
