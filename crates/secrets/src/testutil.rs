//! Shared test utilities for secret store testing.
//!
//! This module provides common helpers for building secret fixtures,
//! pre-populated stores, and failure-injecting store wrappers, plus
//! assertion macros for [`SecretResult`](crate::error::SecretResult)
//! values. It is feature-gated behind `testutil` to prevent leaking into
//! production builds.
//!
//! # Usage
//!
//! In integration tests, enable the feature in `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! certkit-secrets = { path = "../secrets", features = ["testutil"] }
//! ```
//!
//! Then import helpers:
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use certkit_secrets::testutil::{make_secret, store_with_secret};
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::{SecretError, SecretResult},
    store::{MemorySecretStore, SecretStore},
    types::{Namespace, Secret, SecretName},
};

/// Create a [`Secret`] from `(entry, value)` pairs.
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use certkit_secrets::testutil::make_secret;
///
/// let secret = make_secret(&[("username", b"svc"), ("password", b"pw")]);
/// assert_eq!(secret.get("username"), Some(b"svc".as_slice()));
/// ```
#[must_use]
pub fn make_secret(entries: &[(&str, &[u8])]) -> Secret {
    let mut secret = Secret::new();
    for (key, value) in entries {
        secret.insert(*key, value.to_vec());
    }
    secret
}

/// Create a [`MemorySecretStore`] holding one secret at the given coordinates.
///
/// The store is ready for immediate use; add further secrets through
/// [`MemorySecretStore::insert`].
#[must_use]
pub fn store_with_secret(
    namespace: impl Into<Namespace>,
    name: impl Into<SecretName>,
    entries: &[(&str, &[u8])],
) -> MemorySecretStore {
    let store = MemorySecretStore::new();
    store.insert(namespace.into(), name.into(), make_secret(entries));
    store
}

/// Mock store that can be configured to fail the next lookups with a
/// specific error.
///
/// Wraps a [`MemorySecretStore`]; while a failure is set, every
/// `get_secret` call reproduces it. Clearing the failure restores
/// pass-through behavior. Useful for driving error-classification paths in
/// consumers without a real flaky backend.
pub struct FailingSecretStore {
    inner: Arc<MemorySecretStore>,
    fail_with: std::sync::Mutex<Option<SecretError>>,
}

impl FailingSecretStore {
    /// Creates a store with no configured failure.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemorySecretStore::new()),
            fail_with: std::sync::Mutex::new(None),
        }
    }

    /// Sets (or clears) the error returned by subsequent lookups.
    pub fn set_failure(&self, error: Option<SecretError>) {
        *self.fail_with.lock().expect("lock") = error;
    }

    /// Access the wrapped store for seeding.
    #[must_use]
    pub fn inner(&self) -> &MemorySecretStore {
        &self.inner
    }
}

impl Default for FailingSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for FailingSecretStore {
    async fn get_secret(&self, namespace: &Namespace, name: &SecretName) -> SecretResult<Secret> {
        if let Some(ref error) = *self.fail_with.lock().expect("lock") {
            // SecretError is not Clone; rebuild the configured variant.
            return Err(match error {
                SecretError::NotFound { namespace, name } => {
                    SecretError::not_found(namespace.clone(), name.clone())
                },
                SecretError::Connection { message, .. } => SecretError::connection(message),
                SecretError::Timeout => SecretError::timeout(),
                SecretError::Internal { message, .. } => SecretError::internal(message),
            });
        }
        self.inner.get_secret(namespace, name).await
    }
}

/// Assert that a [`SecretResult`](crate::error::SecretResult) is an error of
/// the given [`SecretError`](crate::error::SecretError) variant.
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use certkit_secrets::assert_secret_error;
/// use certkit_secrets::{Secret, SecretError, SecretResult};
///
/// let result: SecretResult<Secret> = Err(SecretError::timeout());
/// assert_secret_error!(result, Timeout);
/// ```
#[macro_export]
macro_rules! assert_secret_error {
    ($result:expr, $variant:ident) => {
        assert!(
            matches!($result, Err($crate::error::SecretError::$variant { .. })),
            concat!("expected SecretError::", stringify!($variant), ", got: {:?}"),
            $result,
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_secret_entries() {
        let secret = make_secret(&[("a", b"1"), ("b", b"2")]);
        assert_eq!(secret.len(), 2);
        assert_eq!(secret.get("a"), Some(b"1".as_slice()));
        assert_eq!(secret.get("b"), Some(b"2".as_slice()));
    }

    #[tokio::test]
    async fn test_store_with_secret_is_functional() {
        let store = store_with_secret("sandbox", "creds", &[("api-key", b"k")]);

        let secret = store
            .get_secret(&Namespace::from("sandbox"), &SecretName::from("creds"))
            .await
            .expect("get");
        assert_eq!(secret.get("api-key"), Some(b"k".as_slice()));
    }

    #[tokio::test]
    async fn test_failing_store_passes_through_without_failure() {
        let store = FailingSecretStore::new();
        store.inner().insert(
            Namespace::from("ns"),
            SecretName::from("creds"),
            make_secret(&[("k", b"v")]),
        );

        let secret =
            store.get_secret(&Namespace::from("ns"), &SecretName::from("creds")).await.expect("get");
        assert_eq!(secret.get("k"), Some(b"v".as_slice()));
    }

    #[tokio::test]
    async fn test_failing_store_reproduces_configured_error() {
        let store = FailingSecretStore::new();
        store.set_failure(Some(SecretError::connection("backend down")));

        let result = store.get_secret(&Namespace::from("ns"), &SecretName::from("creds")).await;
        assert_secret_error!(result, Connection);

        // Clearing restores pass-through (which then reports NotFound).
        store.set_failure(None);
        let result = store.get_secret(&Namespace::from("ns"), &SecretName::from("creds")).await;
        assert_secret_error!(result, NotFound);
    }

    #[test]
    fn test_assert_secret_error_macro() {
        let result: SecretResult<Secret> = Err(SecretError::timeout());
        assert_secret_error!(result, Timeout);
    }
}
