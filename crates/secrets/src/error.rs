//! Secret lookup error types and result alias.
//!
//! This module defines the error types that can occur while resolving
//! credential secrets. All secret store implementations must map their
//! internal errors to these standardized error types.
//!
//! # Error Types
//!
//! - [`SecretError::NotFound`] - The secret does not exist in the store
//! - [`SecretError::Connection`] - Network or connection-related failures
//! - [`SecretError::Internal`] - Store-specific internal errors
//! - [`SecretError::Timeout`] - Lookup exceeded time limit
//!
//! A missing secret is deliberately its own variant: callers park a signing
//! request on [`SecretError::NotFound`] instead of retrying, so it must stay
//! distinguishable from transport failures.
//!
//! # Example
//!
//! ```
//! use certkit_secrets::{SecretError, SecretResult, Secret};
//!
//! fn lookup(namespace: &str, name: &str) -> SecretResult<Secret> {
//!     Err(SecretError::not_found(namespace, name))
//! }
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::types::{Namespace, SecretName};

/// A boxed error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias for secret lookup operations.
pub type SecretResult<T> = Result<T, SecretError>;

/// Errors that can occur during secret lookup.
///
/// This enum represents the canonical set of errors that any secret store
/// can produce. Store implementations should map their internal error types
/// to these variants.
///
/// Errors preserve their source chain via the `#[source]` attribute, enabling
/// debugging tools to display the full error context.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]` — new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SecretError {
    /// The requested secret was not found in the store.
    ///
    /// This is not a transient condition: retrying the lookup will keep
    /// failing until the secret is created.
    #[error("Secret not found: {namespace}/{name}")]
    NotFound {
        /// Namespace the lookup was scoped to.
        namespace: Namespace,
        /// Name of the secret that was not found.
        name: SecretName,
    },

    /// Connection or network error.
    ///
    /// This error indicates a failure to communicate with the secret store,
    /// such as a network timeout, DNS failure, or connection refused.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
        /// The underlying error that caused this connection failure.
        #[source]
        source: Option<BoxError>,
    },

    /// Internal secret store error.
    ///
    /// This is a catch-all for store-specific errors that don't fit other
    /// categories.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
        /// The underlying error that caused this internal failure.
        #[source]
        source: Option<BoxError>,
    },

    /// Lookup timed out.
    ///
    /// The lookup exceeded its configured time limit. This can occur during
    /// slow network conditions or store overload.
    #[error("Lookup timeout")]
    Timeout,
}

impl SecretError {
    /// Creates a new `NotFound` error for the given secret coordinates.
    #[must_use]
    pub fn not_found(namespace: impl Into<Namespace>, name: impl Into<SecretName>) -> Self {
        Self::NotFound { namespace: namespace.into(), name: name.into() }
    }

    /// Creates a new `Connection` error with the given message.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into(), source: None }
    }

    /// Creates a new `Connection` error with a message and source error.
    #[must_use]
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Internal` error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    /// Creates a new `Internal` error with a message and source error.
    #[must_use]
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Internal { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Timeout
    }

    /// Returns `true` if this error means the secret does not exist.
    ///
    /// Callers use this to tell "wait for the secret to appear" apart from
    /// "the lookup itself failed".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
