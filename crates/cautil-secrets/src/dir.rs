//! JSON file-backed secret store.
//!
//! Each entry lives at `<root>/<namespace>/<name>.json`. Entries are
//! written to a temporary file in the namespace directory and moved into
//! place without replacing an existing file, so a failed write never leaves
//! a partial entry and two writers racing on the same name cannot both
//! succeed.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::SecretStore;
use crate::types::{validate_name, SecretEntry};

/// Secret store persisting entries as JSON files under a root directory.
#[derive(Debug, Clone)]
pub struct DirSecretStore {
    root: PathBuf,
}

impl DirSecretStore {
    /// Creates a store rooted at `root`. The directory is created lazily.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, namespace: &str, name: &str) -> Result<PathBuf> {
        validate_name(namespace)?;
        validate_name(name)?;
        Ok(self.root.join(namespace).join(format!("{name}.json")))
    }
}

impl SecretStore for DirSecretStore {
    fn list(&self, namespace: &str, name: &str) -> Result<Vec<SecretEntry>> {
        let path = self.entry_path(namespace, name)?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::Io(e)),
        };

        let entry: SecretEntry =
            serde_json::from_str(&content).map_err(|e| Error::Serialization {
                reason: format!("failed to parse '{}': {e}", path.display()),
            })?;

        Ok(vec![entry])
    }

    fn create(&self, namespace: &str, mut entry: SecretEntry) -> Result<()> {
        let path = self.entry_path(namespace, &entry.name)?;
        entry.namespace = namespace.to_string();

        let json = serde_json::to_string_pretty(&entry).map_err(|e| Error::Serialization {
            reason: format!("failed to serialize secret '{}': {e}", entry.name),
        })?;

        write_new(&path, |file| file.write_all(json.as_bytes())).map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                Error::AlreadyExists {
                    namespace: namespace.to_string(),
                    name: entry.name.clone(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        debug!(path = %path.display(), "wrote secret file");
        Ok(())
    }
}

/// Writes a new file at `path` through a temporary sibling.
///
/// Fails with `AlreadyExists` if `path` is present. The temporary file is
/// removed when `write` or the final move fails.
fn write_new<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist_noclobber(path).map_err(|e| e.error)?;
    Ok(())
}
