//! Idempotent reconciliation of certificate specs into a secret store.
//!
//! For each spec the reconciler looks up the entry named by the spec's
//! derived store-entry name. Present entries are skipped; absent ones get a
//! freshly generated key pair. Writes are not transactional: a failure part
//! way through leaves earlier entries in place, so re-running after an error
//! only creates what is still missing.

use chrono::Utc;
use tracing::{debug, info};

use cautil_pki::{generate, CertificateSpec, KeyPair};

use crate::error::Result;
use crate::store::SecretStore;
use crate::types::{SecretEntry, CA_UTIL_CREATOR, ROOT_CA_CREATOR};

/// Specs split by whether their entry already exists.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    /// Specs whose entry is already in the store.
    pub existing: Vec<&'a CertificateSpec>,
    /// Specs that need an entry created.
    pub missing: Vec<&'a CertificateSpec>,
}

/// Reconciles certificate specs against a secret store.
#[derive(Debug)]
pub struct Reconciler<S> {
    store: S,
    created_by: String,
}

impl<S: SecretStore> Reconciler<S> {
    /// Creates a reconciler labelling entries `createdBy=ca-util`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            created_by: CA_UTIL_CREATOR.to_string(),
        }
    }

    /// Overrides the `createdBy` label value.
    #[must_use]
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    /// Returns the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Splits finalized specs into existing and missing by store-entry name.
    ///
    /// Each lookup is independent; nothing is locked across the batch.
    ///
    /// # Errors
    ///
    /// Returns the first lookup error.
    pub fn partition<'a>(
        &self,
        namespace: &str,
        specs: &[&'a CertificateSpec],
    ) -> Result<Partition<'a>> {
        let mut partition = Partition::default();

        for &spec in specs {
            debug!(secret = %spec.secret_name, namespace, "checking if secret exists");

            if self.store.exists(namespace, &spec.secret_name)? {
                debug!(secret = %spec.secret_name, namespace, "secret already exists");
                partition.existing.push(spec);
            } else {
                debug!(
                    secret = %spec.secret_name,
                    namespace,
                    "secret does not exist and will be created"
                );
                partition.missing.push(spec);
            }
        }

        Ok(partition)
    }

    /// Creates entries for every spec whose entry is missing.
    ///
    /// Returns the key pairs created, in spec order. Specs whose entry already
    /// exists are skipped and contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns the first lookup, generation or create error. Entries created
    /// before the failure are kept.
    pub fn reconcile(&self, namespace: &str, specs: &[&CertificateSpec]) -> Result<Vec<KeyPair>> {
        let partition = self.partition(namespace, specs)?;
        let mut created = Vec::with_capacity(partition.missing.len());

        for spec in partition.missing {
            let pair = generate(spec)?;
            let entry = SecretEntry::tls(&spec.secret_name, namespace, &self.created_by, &pair);
            self.store.create(namespace, entry)?;

            info!(secret = %spec.secret_name, namespace, "secret created");
            created.push(pair);
        }

        Ok(created)
    }

    /// Provisions the fixed ten-year root authority into the entry `name`.
    ///
    /// Returns `None` when the entry already exists. The entry is labelled
    /// `createdBy=root-ca-creator` whatever this reconciler's label is.
    ///
    /// # Errors
    ///
    /// Returns the lookup, generation or create error.
    pub fn provision_root_ca(&self, namespace: &str, name: &str) -> Result<Option<KeyPair>> {
        debug!(secret = %name, namespace, "checking if secret exists");

        if self.store.exists(namespace, name)? {
            info!(secret = %name, namespace, "secret already exists");
            return Ok(None);
        }

        let pair = generate(&CertificateSpec::root_authority(Utc::now()))?;
        let entry = SecretEntry::tls(name, namespace, ROOT_CA_CREATOR, &pair);
        self.store.create(namespace, entry)?;

        info!(secret = %name, namespace, "secret created");
        Ok(Some(pair))
    }
}
