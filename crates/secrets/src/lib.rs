//! Credential secret lookup abstraction for certkit.
//!
//! This crate provides the [`SecretStore`] trait and related types through
//! which certkit components resolve CA credentials. Production deployments
//! bind it to their platform's secret API; tests use the in-memory store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     certkit-issuance                        │
//! │            (signer, outcome classification)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      certkit-venafi                         │
//! │        (client builder: secret -> credentials)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     certkit-secrets                         │
//! │                   SecretStore trait                         │
//! │                 (get_secret, read-only)                     │
//! ├──────────────────┬──────────────────────────────────────────┤
//! │ MemorySecretStore│        platform secret API               │
//! │    (testing)     │       (embedding application)            │
//! └──────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use certkit_secrets::{MemorySecretStore, Namespace, Secret, SecretName, SecretStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemorySecretStore::new();
//!
//!     // Seed a secret
//!     let mut secret = Secret::new();
//!     secret.insert("access-token", b"tpp-token".to_vec());
//!     store.insert(Namespace::from("sandbox"), SecretName::from("venafi-tpp"), secret);
//!
//!     // Look it up the way consumers do
//!     let found = store
//!         .get_secret(&Namespace::from("sandbox"), &SecretName::from("venafi-tpp"))
//!         .await?;
//!     assert_eq!(found.get("access-token"), Some(b"tpp-token".as_slice()));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All lookups return [`SecretResult<T>`], which wraps potential
//! [`SecretError`] variants. A missing secret is always
//! [`SecretError::NotFound`]; consumers rely on that distinction to decide
//! between waiting and retrying.
//!
//! # Feature Flags
//!
//! - **`testutil`**: Enables the `testutil` module with shared test helpers (secret fixtures,
//!   pre-populated stores, failure injection, assertion macros). Enable this in
//!   `[dev-dependencies]` for integration tests.

#![deny(unsafe_code)]

pub mod error;
pub mod store;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;
pub mod types;

// Re-export primary types at crate root for convenience
pub use error::{BoxError, SecretError, SecretResult};
pub use store::{MemorySecretStore, SecretStore};
pub use types::{Namespace, Secret, SecretName, SecretSelector};
pub use zeroize::Zeroizing;
