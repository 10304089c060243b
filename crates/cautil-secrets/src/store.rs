//! Secret store abstraction.
//!
//! The reconciler only needs two operations from a store: list entries in a
//! namespace by exact name, and create an entry. [`MemorySecretStore`] keeps
//! entries in process memory.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::SecretEntry;

/// A namespaced key-value secret store with list/create semantics.
pub trait SecretStore {
    /// Lists entries in `namespace` whose name equals `name`.
    ///
    /// Names are unique within a namespace, so at most one entry comes back.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn list(&self, namespace: &str, name: &str) -> Result<Vec<SecretEntry>>;

    /// Creates `entry` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry already exists or the store rejects the
    /// write.
    fn create(&self, namespace: &str, entry: SecretEntry) -> Result<()>;

    /// Returns true if an entry named `name` exists in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn exists(&self, namespace: &str, name: &str) -> Result<bool> {
        Ok(!self.list(namespace, name)?.is_empty())
    }
}

impl<S: SecretStore + ?Sized> SecretStore for &S {
    fn list(&self, namespace: &str, name: &str) -> Result<Vec<SecretEntry>> {
        (**self).list(namespace, name)
    }

    fn create(&self, namespace: &str, entry: SecretEntry) -> Result<()> {
        (**self).create(namespace, entry)
    }
}

impl<S: SecretStore + ?Sized> SecretStore for Box<S> {
    fn list(&self, namespace: &str, name: &str) -> Result<Vec<SecretEntry>> {
        (**self).list(namespace, name)
    }

    fn create(&self, namespace: &str, entry: SecretEntry) -> Result<()> {
        (**self).create(namespace, entry)
    }
}

/// In-memory secret store.
#[derive(Default)]
pub struct MemorySecretStore {
    /// Entries keyed by (namespace, name).
    entries: RwLock<BTreeMap<(String, String), SecretEntry>>,
}

impl MemorySecretStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of an entry.
    #[must_use]
    pub fn get(&self, namespace: &str, name: &str) -> Option<SecretEntry> {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Returns the names of all entries in a namespace.
    #[must_use]
    pub fn names(&self, namespace: &str) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Returns the number of entries across all namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecretStore for MemorySecretStore {
    fn list(&self, namespace: &str, name: &str) -> Result<Vec<SecretEntry>> {
        Ok(self.get(namespace, name).into_iter().collect())
    }

    fn create(&self, namespace: &str, mut entry: SecretEntry) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let key = (namespace.to_string(), entry.name.clone());
        if entries.contains_key(&key) {
            return Err(Error::AlreadyExists {
                namespace: namespace.to_string(),
                name: entry.name,
            });
        }

        entry.namespace = namespace.to_string();
        debug!(name = %entry.name, namespace, "storing secret in memory");
        entries.insert(key, entry);

        Ok(())
    }
}

impl std::fmt::Debug for MemorySecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySecretStore")
            .field("entries_count", &self.len())
            .finish()
    }
}
