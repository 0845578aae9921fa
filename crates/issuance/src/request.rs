//! Signing request and issuer reference types.
//!
//! A [`SigningRequest`] is immutable once handed to the signer. The CSR
//! payload is opaque PEM; nothing in this crate parses it.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use certkit_secrets::Namespace;
use serde::{Deserialize, Serialize};

/// Certificate lifetime requested when the request does not carry one
/// (90 days).
pub const DEFAULT_CERTIFICATE_DURATION: Duration = Duration::from_secs(90 * 24 * 60 * 60);

/// Name of an issuer resource.
///
/// # Example
///
/// ```
/// use certkit_issuance::IssuerName;
///
/// let name = IssuerName::from("venafi-prod");
/// assert_eq!(name.as_str(), "venafi-prod");
/// assert_eq!(name.to_string(), "venafi-prod");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuerName(String);

impl IssuerName {
    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for IssuerName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for IssuerName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<IssuerName> for String {
    fn from(value: IssuerName) -> Self {
        value.0
    }
}

impl fmt::Display for IssuerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scope of an issuer resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssuerKind {
    /// Issuer scoped to one namespace.
    Issuer,
    /// Cluster-wide issuer.
    ClusterIssuer,
}

impl IssuerKind {
    /// Returns the kind as its canonical string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issuer => "Issuer",
            Self::ClusterIssuer => "ClusterIssuer",
        }
    }
}

impl fmt::Display for IssuerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_issuer_kind() -> IssuerKind {
    IssuerKind::Issuer
}

/// Reference from a signing request to the issuer that should serve it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssuerRef {
    /// Name of the issuer resource.
    pub name: IssuerName,

    /// Scope of the issuer resource. Defaults to [`IssuerKind::Issuer`].
    #[serde(default = "default_issuer_kind")]
    pub kind: IssuerKind,
}

impl IssuerRef {
    /// Creates a reference with an explicit kind.
    pub fn new(name: impl Into<IssuerName>, kind: IssuerKind) -> Self {
        Self { name: name.into(), kind }
    }

    /// Creates a reference to a namespace-scoped issuer.
    pub fn namespaced(name: impl Into<IssuerName>) -> Self {
        Self::new(name, IssuerKind::Issuer)
    }

    /// Creates a reference to a cluster-wide issuer.
    pub fn cluster(name: impl Into<IssuerName>) -> Self {
        Self::new(name, IssuerKind::ClusterIssuer)
    }
}

/// One request to sign a certificate.
///
/// Immutable once constructed. The signer reads it, submits the CSR, and
/// reports the outcome; nothing here is mutated along the way.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use certkit_issuance::{IssuerRef, SigningRequest};
///
/// let request = SigningRequest::builder()
///     .namespace("apps")
///     .name("web-tls")
///     .csr_pem(&b"-----BEGIN CERTIFICATE REQUEST-----..."[..])
///     .duration(Duration::from_secs(3600))
///     .issuer_ref(IssuerRef::namespaced("venafi-prod"))
///     .build();
///
/// assert_eq!(request.effective_duration(), Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigningRequest {
    /// Namespace the request lives in.
    #[builder(into)]
    pub namespace: Namespace,

    /// Name of the request, for audit events and logs.
    #[builder(into)]
    pub name: String,

    /// PEM-encoded certificate signing request, treated as opaque bytes.
    #[builder(into)]
    pub csr_pem: Bytes,

    /// Requested certificate lifetime. When absent the signer applies
    /// [`DEFAULT_CERTIFICATE_DURATION`].
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,

    /// Issuer that should serve this request.
    pub issuer_ref: IssuerRef,
}

impl SigningRequest {
    /// Returns the lifetime to request from the CA, applying the default
    /// when the request carries none.
    ///
    /// The result is what gets asked of the CA; the CA's policy zone may
    /// still override it.
    #[must_use]
    pub fn effective_duration(&self) -> Duration {
        self.duration.unwrap_or(DEFAULT_CERTIFICATE_DURATION)
    }
}
