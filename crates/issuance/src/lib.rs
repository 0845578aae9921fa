//! # CertKit Issuance
//!
//! The signing decision core: one call per certificate request, one
//! audit event per call, and a fixed vocabulary of outcomes.
//!
//! This crate provides:
//! - **Signer**: drives one signing attempt end to end against a CA
//! - **Outcome classification**: every failure maps to a stable reason,
//!   a fixed message, and a retry decision
//! - **Audit events**: exactly one [`AuditEvent`] per attempt, pushed to
//!   a pluggable [`EventSink`]
//! - **Issuer resolution**: namespaced and cluster-wide issuers with
//!   scope-aware credential lookup
//!
//! ## Features
//!
//! - Errors are returned only on paths that should be retried; parked
//!   and terminal outcomes return `Ok(None)`
//! - A certificate and an error are never produced together
//! - Reason-code strings are stable public identifiers
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use certkit_issuance::{Issuer, IssuerRef, Signer, SigningRequest, TracingEventSink};
//! use certkit_secrets::{MemorySecretStore, SecretSelector};
//! use certkit_venafi::{TppConnection, VenafiClientBuilder, VenafiConfig, VenafiConnection};
//! # use async_trait::async_trait;
//! # use certkit_venafi::{ConnectionProfile, Connector, VenafiClient, VenafiResult};
//! # #[derive(Debug, Clone)]
//! # struct VcertConnector;
//! # #[async_trait]
//! # impl Connector for VcertConnector {
//! #     async fn connect(&self, _: ConnectionProfile) -> VenafiResult<Arc<dyn VenafiClient>> {
//! #         unimplemented!()
//! #     }
//! # }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VenafiConfig::builder()
//!     .zone(r"TLS\Internal")
//!     .connection(VenafiConnection::Tpp(
//!         TppConnection::builder()
//!             .url("https://tpp.example.com/vedsdk")
//!             .credentials_ref(SecretSelector::new("tpp-credentials"))
//!             .build(),
//!     ))
//!     .build()?;
//!
//! let signer = Signer::builder()
//!     .secrets(Arc::new(MemorySecretStore::new()))
//!     .client_builder(Arc::new(VenafiClientBuilder::new(VcertConnector)))
//!     .events(Arc::new(TracingEventSink::new()))
//!     .build();
//!
//! let request = SigningRequest::builder()
//!     .namespace("apps")
//!     .name("web-tls")
//!     .csr_pem(&b"-----BEGIN CERTIFICATE REQUEST-----..."[..])
//!     .issuer_ref(IssuerRef::namespaced("venafi-prod"))
//!     .build();
//! let issuer = Issuer::namespaced("apps", "venafi-prod", config);
//!
//! match signer.sign(&request, &issuer).await? {
//!     Some(response) => println!("issued {} bytes", response.certificate().len()),
//!     None => println!("parked; waiting on an external change"),
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Signing error types.
pub mod error;
/// Audit events, severities, and sinks.
pub mod events;
/// Issuer resources and lookup.
pub mod issuer;
/// Failure classification into outcomes.
pub mod outcome;
/// Signing request and issuer reference types.
pub mod request;
/// The signer itself.
pub mod signer;

/// Test fixtures. Gated behind the `testutil` feature.
#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

// Re-export key types for convenience
pub use error::{SignError, SignResult};
pub use events::{
    AuditEvent, EventSeverity, EventSink, NoopEventSink, ReasonCode, TracingEventSink,
};
pub use issuer::{Issuer, IssuerError, IssuerResolver, MemoryIssuerResolver};
pub use outcome::{SignOutcome, classify_build_error, classify_sign_error};
pub use request::{
    DEFAULT_CERTIFICATE_DURATION, IssuerKind, IssuerName, IssuerRef, SigningRequest,
};
pub use signer::{DEFAULT_CLUSTER_RESOURCE_NAMESPACE, IssueResponse, Signer};
