//! # cautil-cli
//!
//! The `ca-util` command-line tool.
//!
//! Provides commands for:
//! - Generating a certificate hierarchy from a YAML or TOML config file
//! - Creating a single self-signed CA
//! - Reconciling certificates into a directory-backed TLS secret store
//! - Provisioning a fixed root CA into a named secret
//!
//! Certificate work lives in `cautil-pki` and store work in
//! `cautil-secrets`; this crate parses arguments, loads config and formats
//! output.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{CaArgs, Cli, Commands, CreateArgs, CreateCommands, Format, SecretArgs};
pub use config::CaUtilConfig;
pub use error::CliError;
pub use output::OutputFormat;
