//! Lookup trait for credential secrets.
//!
//! This module provides the [`SecretStore`] trait that abstracts read-only
//! access to credential secrets. Implementations can sit on different
//! backends (a cluster secret API in production, in-memory for testing).
//!
//! # Usage
//!
//! ```no_run
//! // Demonstrates the trait interface; requires a concrete store implementation.
//! use certkit_secrets::{Namespace, Secret, SecretError, SecretName, SecretStore};
//!
//! async fn fetch_credentials<S: SecretStore>(
//!     store: &S,
//!     namespace: &Namespace,
//!     name: &SecretName,
//! ) -> Result<Secret, SecretError> {
//!     store.get_secret(namespace, name).await
//! }
//! ```

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{
    error::{SecretError, SecretResult},
    types::{Namespace, Secret, SecretName},
};

/// Read-only access to credential secrets.
///
/// Abstracts secret lookup so production (cluster secret API) and testing
/// (in-memory) can share the same interface. Consumers of this trait never
/// create, mutate, or cache secrets; they look one up when they need it and
/// let the material drop afterwards.
///
/// # Error Handling
///
/// A secret that does not exist is [`SecretError::NotFound`] — never an
/// empty [`Secret`] and never a catch-all error. Callers make scheduling
/// decisions on that distinction (wait for the secret to appear versus
/// retry a failing store), so implementations must preserve it.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Retrieves a secret by namespace and name.
    ///
    /// # Arguments
    ///
    /// * `namespace` - Namespace the secret lives in
    /// * `name` - Name of the secret
    ///
    /// # Returns
    ///
    /// The secret's entries. The returned [`Secret`] owns its material and
    /// zeroizes it on drop.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The secret does not exist ([`SecretError::NotFound`])
    /// - The store is unreachable ([`SecretError::Connection`])
    /// - The lookup exceeds its time limit ([`SecretError::Timeout`])
    async fn get_secret(&self, namespace: &Namespace, name: &SecretName) -> SecretResult<Secret>;
}

/// In-memory implementation of [`SecretStore`] for testing.
///
/// This implementation holds secrets in a thread-safe hash map, suitable
/// for unit tests and development. It does not persist data between
/// restarts.
///
/// Seeding goes through the inherent [`insert`](Self::insert) and
/// [`remove`](Self::remove) methods; the [`SecretStore`] trait itself stays
/// read-only.
///
/// # Thread Safety
///
/// Uses [`parking_lot::RwLock`] for efficient concurrent access with
/// reader-writer semantics.
///
/// # Examples
///
/// ```
/// use certkit_secrets::{MemorySecretStore, Namespace, Secret, SecretName, SecretStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemorySecretStore::new();
///     let ns = Namespace::from("sandbox");
///
///     let mut secret = Secret::new();
///     secret.insert("api-key", b"k3y".to_vec());
///     store.insert(ns.clone(), SecretName::from("cloud-creds"), secret);
///
///     let found = store.get_secret(&ns, &SecretName::from("cloud-creds")).await?;
///     assert_eq!(found.get("api-key"), Some(b"k3y".as_slice()));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemorySecretStore {
    /// Secrets indexed by (namespace, name).
    secrets: Arc<RwLock<HashMap<(Namespace, SecretName), Secret>>>,
}

impl MemorySecretStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a composite key for the hash map.
    fn make_key(namespace: &Namespace, name: &SecretName) -> (Namespace, SecretName) {
        (namespace.clone(), name.clone())
    }

    /// Inserts a secret, replacing any existing one at the same coordinates.
    pub fn insert(&self, namespace: Namespace, name: SecretName, secret: Secret) {
        self.secrets.write().insert((namespace, name), secret);
    }

    /// Removes a secret. Returns `true` if one existed.
    pub fn remove(&self, namespace: &Namespace, name: &SecretName) -> bool {
        self.secrets.write().remove(&Self::make_key(namespace, name)).is_some()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    #[tracing::instrument(skip(self))]
    async fn get_secret(&self, namespace: &Namespace, name: &SecretName) -> SecretResult<Secret> {
        let map_key = Self::make_key(namespace, name);
        let secrets = self.secrets.read();

        secrets
            .get(&map_key)
            .cloned()
            .ok_or_else(|| SecretError::not_found(namespace.clone(), name.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::assert_secret_error;

    /// Creates a secret with a single entry.
    fn make_entry_secret(key: &str, value: &[u8]) -> Secret {
        let mut secret = Secret::new();
        secret.insert(key, value.to_vec());
        secret
    }

    #[tokio::test]
    async fn test_insert_and_get_secret() {
        let store = MemorySecretStore::new();
        let ns = Namespace::from("team-a");
        let name = SecretName::from("tpp-creds");

        store.insert(ns.clone(), name.clone(), make_entry_secret("username", b"svc"));

        let found = store.get_secret(&ns, &name).await.expect("get_secret should succeed");
        assert_eq!(found.get("username"), Some(b"svc".as_slice()));
    }

    #[tokio::test]
    async fn test_get_missing_secret_is_not_found() {
        let store = MemorySecretStore::new();

        let result =
            store.get_secret(&Namespace::from("team-a"), &SecretName::from("missing")).await;

        assert_secret_error!(result, NotFound);
    }

    #[tokio::test]
    async fn test_not_found_carries_coordinates() {
        let store = MemorySecretStore::new();

        let err = store
            .get_secret(&Namespace::from("team-a"), &SecretName::from("missing"))
            .await
            .expect_err("lookup should fail");

        match err {
            SecretError::NotFound { namespace, name } => {
                assert_eq!(namespace.as_str(), "team-a");
                assert_eq!(name.as_str(), "missing");
            },
            other => panic!("expected NotFound, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_same_name_different_namespaces() {
        let store = MemorySecretStore::new();
        let name = SecretName::from("shared-name");

        store.insert(Namespace::from("ns-1"), name.clone(), make_entry_secret("k", b"one"));
        store.insert(Namespace::from("ns-2"), name.clone(), make_entry_secret("k", b"two"));

        let one = store.get_secret(&Namespace::from("ns-1"), &name).await.expect("ns-1");
        let two = store.get_secret(&Namespace::from("ns-2"), &name).await.expect("ns-2");

        assert_eq!(one.get("k"), Some(b"one".as_slice()));
        assert_eq!(two.get("k"), Some(b"two".as_slice()));
    }

    #[tokio::test]
    async fn test_insert_replaces_existing() {
        let store = MemorySecretStore::new();
        let ns = Namespace::from("team-a");
        let name = SecretName::from("rotating");

        store.insert(ns.clone(), name.clone(), make_entry_secret("token", b"old"));
        store.insert(ns.clone(), name.clone(), make_entry_secret("token", b"new"));

        let found = store.get_secret(&ns, &name).await.expect("get");
        assert_eq!(found.get("token"), Some(b"new".as_slice()));
    }

    #[tokio::test]
    async fn test_remove_secret() {
        let store = MemorySecretStore::new();
        let ns = Namespace::from("team-a");
        let name = SecretName::from("ephemeral");

        store.insert(ns.clone(), name.clone(), make_entry_secret("k", b"v"));
        assert!(store.remove(&ns, &name));
        assert!(!store.remove(&ns, &name), "second remove should report absence");

        let result = store.get_secret(&ns, &name).await;
        assert_secret_error!(result, NotFound);
    }

    #[tokio::test]
    async fn test_clone_store_shares_state() {
        let store = MemorySecretStore::new();
        let cloned = store.clone();
        let ns = Namespace::from("team-a");
        let name = SecretName::from("shared");

        store.insert(ns.clone(), name.clone(), make_entry_secret("k", b"v"));

        let found = cloned.get_secret(&ns, &name).await.expect("get via clone");
        assert_eq!(found.get("k"), Some(b"v".as_slice()));
    }
}
