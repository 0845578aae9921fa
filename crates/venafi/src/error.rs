//! Error types for the Venafi client facade.
//!
//! This module defines two vocabularies. [`VenafiError`] is what a connected
//! client can produce while signing; its two named variants
//! ([`CertificatePending`](VenafiError::CertificatePending) and
//! [`RetrieveTimeout`](VenafiError::RetrieveTimeout)) are load-bearing —
//! consumers classify them specially and treat everything else uniformly.
//! [`BuildError`] covers client construction, where the load-bearing
//! distinction is [`CredentialsNotFound`](BuildError::CredentialsNotFound)
//! versus everything else.

use std::sync::Arc;

use certkit_secrets::{Namespace, SecretError, SecretName};
use thiserror::Error;

/// A boxed error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias for Venafi client operations.
pub type VenafiResult<T> = std::result::Result<T, VenafiError>;

/// Errors produced by a connected Venafi client.
///
/// The variant set is a contract: `CertificatePending` and `RetrieveTimeout`
/// keep their meaning across versions because outcome classification and
/// retry behavior hang off them. Transport and CA-side failures collapse
/// into `Connection` and `Api`.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]` — new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VenafiError {
    /// The CA accepted the request but has not issued the certificate yet.
    ///
    /// Typical for TPP zones with manual approval steps. The request should
    /// be retried later; `pickup_id` identifies it on the CA side.
    #[error("Certificate issuance is pending: pickup id {pickup_id}")]
    CertificatePending {
        /// CA-side identifier for retrieving the certificate later.
        pickup_id: String,
        /// CA-reported request status, when available.
        status: Option<String>,
    },

    /// Gave up waiting for the CA to hand over the issued certificate.
    #[error("Timed out retrieving certificate: pickup id {pickup_id}")]
    RetrieveTimeout {
        /// CA-side identifier of the request that timed out.
        pickup_id: String,
    },

    /// Connection or network error.
    ///
    /// This error indicates a failure to communicate with the CA, such as a
    /// network timeout, DNS failure, or connection refused.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
        /// The underlying error that caused this connection failure.
        #[source]
        source: Option<BoxError>,
    },

    /// The CA rejected the request or returned a protocol-level error.
    #[error("CA error: {message}")]
    Api {
        /// Description of the CA-side error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Configuration error: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },
}

impl VenafiError {
    /// Creates a new `CertificatePending` error.
    #[must_use]
    pub fn pending(pickup_id: impl Into<String>) -> Self {
        Self::CertificatePending { pickup_id: pickup_id.into(), status: None }
    }

    /// Creates a new `CertificatePending` error with a CA-reported status.
    #[must_use]
    pub fn pending_with_status(pickup_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self::CertificatePending { pickup_id: pickup_id.into(), status: Some(status.into()) }
    }

    /// Creates a new `RetrieveTimeout` error.
    #[must_use]
    pub fn retrieve_timeout(pickup_id: impl Into<String>) -> Self {
        Self::RetrieveTimeout { pickup_id: pickup_id.into() }
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

    /// Creates a new `Api` error with the given message.
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api { message: message.into() }
    }

    /// Creates a new `InvalidConfig` error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    /// Returns `true` if the CA is still working on the request.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::CertificatePending { .. })
    }

    /// Returns `true` if certificate retrieval timed out.
    #[must_use]
    pub fn is_retrieve_timeout(&self) -> bool {
        matches!(self, Self::RetrieveTimeout { .. })
    }
}

/// Errors produced while constructing a Venafi client.
///
/// Construction resolves a credentials secret, decodes it, and connects.
/// `CredentialsNotFound` is kept apart from every other failure because
/// consumers park the request on it instead of retrying.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]` — new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// The credentials secret does not exist.
    #[error("Credentials secret not found: {namespace}/{name}")]
    CredentialsNotFound {
        /// Namespace the secret was looked up in.
        namespace: Namespace,
        /// Name of the missing secret.
        name: SecretName,
    },

    /// The credentials secret exists but its contents are unusable.
    #[error("Invalid credentials secret: {message}")]
    Credentials {
        /// Description of what is wrong with the secret contents.
        message: String,
    },

    /// Secret lookup failed for a reason other than absence.
    #[error("Secret lookup failed")]
    Secrets {
        /// The underlying lookup error.
        #[source]
        source: SecretError,
    },

    /// The transport client could not be initialized.
    #[error("Client initialization failed")]
    Client {
        /// The underlying client error.
        #[source]
        source: VenafiError,
    },
}

impl BuildError {
    /// Creates a new `Credentials` error with the given message.
    #[must_use]
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials { message: message.into() }
    }

    /// Returns `true` if the failure was a missing credentials secret.
    ///
    /// Callers use this to tell "wait for the secret to appear" apart from
    /// every other initialization failure.
    #[must_use]
    pub fn is_credentials_not_found(&self) -> bool {
        matches!(self, Self::CredentialsNotFound { .. })
    }
}

/// Converts a secret lookup error into a build error.
///
/// This mapping preserves the load-bearing distinction: a missing secret
/// becomes [`BuildError::CredentialsNotFound`] with its coordinates; every
/// other lookup failure is wrapped as [`BuildError::Secrets`].
impl From<SecretError> for BuildError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::NotFound { namespace, name } => {
                Self::CredentialsNotFound { namespace, name }
            },
            SecretError::Timeout => {
                tracing::warn!("secret lookup timed out during client construction");
                Self::Secrets { source: SecretError::Timeout }
            },
            other => Self::Secrets { source: other },
        }
    }
}

/// Converts a client error raised during connection into a build error.
impl From<VenafiError> for BuildError {
    fn from(err: VenafiError) -> Self {
        Self::Client { source: err }
    }
}
