//! Test fixtures for exercising signing flows.
//!
//! Enabled with `#[cfg(test)]` inside this crate. External consumers can
//! opt in through the `testutil` feature:
//!
//! ```toml
//! [dev-dependencies]
//! certkit-issuance = { version = "0.1", features = ["testutil"] }
//! ```
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use certkit_issuance::testutil::{RecordingEventSink, test_issuer, test_request};
//! use certkit_issuance::{EventSeverity, ReasonCode, Signer};
//! use certkit_secrets::MemorySecretStore;
//! use certkit_venafi::VenafiClientBuilder;
//! use certkit_venafi::testutil::{StaticConnector, tpp_token_secret};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let secrets = MemorySecretStore::new();
//! secrets.insert("apps".into(), "tpp-credentials".into(), tpp_token_secret());
//! let events = Arc::new(RecordingEventSink::new());
//!
//! let signer = Signer::builder()
//!     .secrets(Arc::new(secrets))
//!     .client_builder(Arc::new(VenafiClientBuilder::new(StaticConnector::ok())))
//!     .events(events.clone())
//!     .build();
//!
//! let response = signer.sign(&test_request(), &test_issuer()).await.unwrap();
//! assert!(response.is_some());
//! certkit_issuance::assert_single_event!(
//!     events,
//!     ReasonCode::CertificateIssued,
//!     EventSeverity::Normal
//! );
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::events::{AuditEvent, EventSink};
use crate::issuer::Issuer;
use crate::request::{IssuerRef, SigningRequest};

/// A syntactically plausible CSR. Nothing in this crate parses it.
pub const TEST_CSR_PEM: &[u8] = b"-----BEGIN CERTIFICATE REQUEST-----\n\
MIIBVDCBvAIBADAVMRMwEQYDVQQDEwp3ZWIuYXBwcy5zdmMwgZ8wDQYJKoZIhvcN\n\
AQEBBQADgY0AMIGJAoGBALkCsS1h7Kp2Kpjn7V5MAwr5vWtqJfWJvvLarY9mikH6\n\
-----END CERTIFICATE REQUEST-----\n";

/// [`EventSink`] that captures every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every recorded event, in order.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    /// Returns the most recent event, if any.
    #[must_use]
    pub fn last(&self) -> Option<AuditEvent> {
        self.events.lock().last().cloned()
    }

    /// Returns how many events have been recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns `true` if no event has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn record(&self, event: &AuditEvent) {
        self.events.lock().push(event.clone());
    }
}

/// A signing request for `web-tls` in the `apps` namespace, referencing
/// the namespaced issuer `venafi-prod`, with no explicit duration.
#[must_use]
pub fn test_request() -> SigningRequest {
    SigningRequest::builder()
        .namespace("apps")
        .name("web-tls")
        .csr_pem(TEST_CSR_PEM)
        .issuer_ref(IssuerRef::namespaced("venafi-prod"))
        .build()
}

/// Same as [`test_request`] with an explicit requested duration.
#[must_use]
pub fn test_request_with_duration(duration: Duration) -> SigningRequest {
    SigningRequest::builder()
        .namespace("apps")
        .name("web-tls")
        .csr_pem(TEST_CSR_PEM)
        .duration(duration)
        .issuer_ref(IssuerRef::namespaced("venafi-prod"))
        .build()
}

/// Namespaced issuer `venafi-prod` in `apps`, using the TPP fixture
/// configuration from `certkit_venafi::testutil`.
#[must_use]
pub fn test_issuer() -> Issuer {
    Issuer::namespaced("apps", "venafi-prod", certkit_venafi::testutil::test_tpp_config())
}

/// Cluster-wide issuer `venafi-global` using the TPP fixture
/// configuration.
#[must_use]
pub fn test_cluster_issuer() -> Issuer {
    Issuer::cluster("venafi-global", certkit_venafi::testutil::test_tpp_config())
}

/// Asserts that a [`RecordingEventSink`] holds exactly one event with the
/// given reason and severity, optionally checking that the message
/// contains a substring.
///
/// ```ignore
/// assert_single_event!(sink, ReasonCode::Timeout, EventSeverity::Warning);
/// assert_single_event!(sink, ReasonCode::Retrieve, EventSeverity::Warning, "CA error");
/// ```
#[macro_export]
macro_rules! assert_single_event {
    ($sink:expr, $reason:expr, $severity:expr) => {{
        let events = $sink.events();
        assert_eq!(events.len(), 1, "expected exactly one audit event, got {}", events.len());
        assert_eq!(events[0].reason, $reason, "unexpected reason: {:?}", events[0].reason);
        assert_eq!(events[0].severity, $severity, "unexpected severity: {}", events[0].severity);
    }};
    ($sink:expr, $reason:expr, $severity:expr, $message:expr) => {{
        let events = $sink.events();
        assert_eq!(events.len(), 1, "expected exactly one audit event, got {}", events.len());
        assert_eq!(events[0].reason, $reason, "unexpected reason: {:?}", events[0].reason);
        assert_eq!(events[0].severity, $severity, "unexpected severity: {}", events[0].severity);
        assert!(
            events[0].message.contains($message),
            "event message {:?} does not contain {:?}",
            events[0].message,
            $message
        );
    }};
}
