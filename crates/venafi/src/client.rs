//! The CA client facade.
//!
//! [`VenafiClient`] is the narrow surface the rest of the system issues
//! certificates through. Implementations wrap a product-specific transport
//! (TPP or Cloud) behind the same two calls and the same closed error
//! vocabulary, so callers never branch on which product they talk to.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::VenafiResult;

/// A signed certificate chain in PEM encoding.
///
/// The payload is the leaf certificate followed by any intermediates, as
/// returned by the CA. The `Debug` impl prints only the length to keep log
/// lines short.
#[derive(Clone, PartialEq, Eq)]
pub struct CertificatePem(Bytes);

impl CertificatePem {
    /// Wraps raw PEM bytes.
    pub fn new(pem: impl Into<Bytes>) -> Self {
        Self(pem.into())
    }

    /// Returns the PEM payload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the wrapper and returns the underlying buffer.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CertificatePem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificatePem").field("len", &self.0.len()).finish()
    }
}

impl AsRef<[u8]> for CertificatePem {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Bytes> for CertificatePem {
    fn from(pem: Bytes) -> Self {
        Self(pem)
    }
}

impl From<Vec<u8>> for CertificatePem {
    fn from(pem: Vec<u8>) -> Self {
        Self(Bytes::from(pem))
    }
}

/// Facade over a Venafi CA connection.
///
/// # Contract
///
/// [`sign`](Self::sign) submits a PEM-encoded CSR and blocks until the CA
/// returns the signed chain or the configured request timeout elapses.
/// Failures surface through the closed [`VenafiError`](crate::VenafiError)
/// vocabulary:
///
/// - [`CertificatePending`](crate::VenafiError::CertificatePending) when the
///   CA accepted the request but has not signed it yet
/// - [`RetrieveTimeout`](crate::VenafiError::RetrieveTimeout) when the
///   request timeout elapsed while polling for the chain
/// - [`Connection`](crate::VenafiError::Connection) and
///   [`Api`](crate::VenafiError::Api) for transport and CA-side failures
///
/// The requested duration is advisory. The CA's policy zone may clamp or
/// override it, so callers must read the actual lifetime from the returned
/// chain.
///
/// # Thread Safety
///
/// Implementations are `Send + Sync` and shared behind `Arc`, so one client
/// can serve concurrent signing requests.
#[async_trait]
pub trait VenafiClient: fmt::Debug + Send + Sync {
    /// Submits a CSR and returns the signed certificate chain.
    ///
    /// # Arguments
    ///
    /// * `csr_pem` - PEM-encoded certificate signing request.
    /// * `duration` - Requested certificate lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error from the closed vocabulary described on the trait.
    async fn sign(&self, csr_pem: &[u8], duration: Duration) -> VenafiResult<CertificatePem>;

    /// Verifies the CA is reachable and the credentials are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Connection`](crate::VenafiError::Connection) or
    /// [`Api`](crate::VenafiError::Api) when the CA cannot be reached or
    /// rejects the credentials.
    async fn ping(&self) -> VenafiResult<()>;
}
