//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Namespace used when none is given.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Store directory used when none is given.
pub const DEFAULT_STORE_DIR: &str = ".ca-util";

/// Cert authority and TLS utility.
///
/// Create self-signed CAs, create and sign certs, optionally store them as
/// TLS secrets.
#[derive(Parser, Debug, Clone)]
#[command(name = "ca-util")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the secret store.
    #[arg(long, global = true, env = "CAUTIL_STORE_DIR", default_value = DEFAULT_STORE_DIR)]
    pub store_dir: PathBuf,

    /// Output format.
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Log filter used when `RUST_LOG` is unset (e.g. `debug`, `cautil_secrets=trace`).
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create cert(s) from a config file, or a single CA with `create ca`.
    ///
    /// Example: `ca-util create --config myfile.yaml`
    Create(CreateArgs),

    /// Provision a ten-year root CA into one named TLS secret.
    ///
    /// Does nothing if the secret already exists.
    Secret(SecretArgs),
}

/// Arguments for `create`.
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Config file listing certificate authorities (YAML, or TOML by extension).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Store the certs as TLS secrets instead of printing them.
    #[arg(short = 'k', long, conflicts_with_all = ["chain", "out_dir"])]
    pub store: bool,

    /// Namespace for stored secrets.
    #[arg(short, long, env = "CAUTIL_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Sign each authority's certs with the authority's key.
    #[arg(long)]
    pub chain: bool,

    /// Write `<secret-name>.crt` and `<secret-name>.key` files here.
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Create subcommand.
    #[command(subcommand)]
    pub command: Option<CreateCommands>,
}

/// `create` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum CreateCommands {
    /// Create a self-signed root CA.
    ///
    /// Example: `ca-util create ca -c "my common name"`
    Ca(CaArgs),
}

/// Arguments for `create ca`.
#[derive(Args, Debug, Clone)]
pub struct CaArgs {
    /// Common name of the CA to create.
    #[arg(short, long)]
    pub common_name: String,

    /// Store the CA as a TLS secret instead of printing it.
    #[arg(short = 'k', long)]
    pub store: bool,

    /// Namespace for the stored secret. Falls back to the `create`-level
    /// namespace, which reads `CAUTIL_NAMESPACE`.
    #[arg(short, long)]
    pub namespace: Option<String>,
}

impl CaArgs {
    /// Namespace the secret goes to.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }
}

/// Arguments for `secret`.
#[derive(Args, Debug, Clone)]
pub struct SecretArgs {
    /// Name of the secret to create.
    pub name: String,

    /// Namespace the secret will be created in.
    #[arg(short, long, env = "CAUTIL_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,
}
