//! Signing outcome matrix.
//!
//! Drives [`Signer::sign`] through every outcome it can produce, using an
//! in-memory secret store, a scripted CA client, and a recording event
//! sink. Each test pins down the full triple: the return value, whether an
//! error is surfaced, and the single audit event recorded for the attempt.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use certkit_issuance::testutil::{
    RecordingEventSink, TEST_CSR_PEM, test_cluster_issuer, test_issuer, test_request,
    test_request_with_duration,
};
use certkit_issuance::{
    EventSeverity, Issuer, IssuerRef, IssuerResolver, MemoryIssuerResolver, ReasonCode, SignError,
    Signer, SigningRequest, assert_single_event,
};
use certkit_secrets::testutil::{FailingSecretStore, make_secret};
use certkit_secrets::{MemorySecretStore, SecretError};
use certkit_venafi::testutil::{
    MockVenafiClient, StaticConnector, TEST_CERT_PEM, test_tpp_config, tpp_token_secret,
};
use certkit_venafi::{VenafiClientBuilder, VenafiError};

// ============================================================================
// Test Harness
// ============================================================================

struct Harness {
    secrets: MemorySecretStore,
    client: Arc<MockVenafiClient>,
    events: Arc<RecordingEventSink>,
    signer: Signer,
}

fn harness() -> Harness {
    let secrets = MemorySecretStore::new();
    let client = Arc::new(MockVenafiClient::new());
    let events = Arc::new(RecordingEventSink::new());
    let connector = StaticConnector::with_client(client.clone());

    let signer = Signer::builder()
        .secrets(Arc::new(secrets.clone()))
        .client_builder(Arc::new(VenafiClientBuilder::new(connector)))
        .events(events.clone())
        .build();

    Harness { secrets, client, events, signer }
}

fn seed_credentials(secrets: &MemorySecretStore, namespace: &str) {
    secrets.insert(namespace.into(), "tpp-credentials".into(), tpp_token_secret());
}

// ============================================================================
// Issuance
// ============================================================================

#[tokio::test]
async fn test_issued_certificate_passes_through() {
    let h = harness();
    seed_credentials(&h.secrets, "apps");

    let response = h.signer.sign(&test_request(), &test_issuer()).await.expect("no retry error");
    let response = response.expect("certificate issued");

    assert_eq!(response.certificate().as_bytes(), TEST_CERT_PEM);
    assert_single_event!(h.events, ReasonCode::CertificateIssued, EventSeverity::Normal);

    let event = h.events.last().expect("event recorded");
    assert_eq!(event.message, "certificate issued");
    assert_eq!(event.namespace.as_str(), "apps");
    assert_eq!(event.request, "web-tls");
}

#[tokio::test]
async fn test_csr_reaches_client_unmodified() {
    let h = harness();
    seed_credentials(&h.secrets, "apps");

    h.signer.sign(&test_request(), &test_issuer()).await.expect("sign");

    let call = h.client.last_sign_call().expect("client invoked");
    assert_eq!(call.csr_pem, TEST_CSR_PEM);
}

// ============================================================================
// Duration Defaulting
// ============================================================================

#[tokio::test]
async fn test_duration_defaults_to_90_days() {
    let h = harness();
    seed_credentials(&h.secrets, "apps");

    h.signer.sign(&test_request(), &test_issuer()).await.expect("sign");

    let call = h.client.last_sign_call().expect("client invoked");
    assert_eq!(call.duration, Duration::from_secs(7_776_000));
}

#[tokio::test]
async fn test_requested_duration_reaches_client() {
    let h = harness();
    seed_credentials(&h.secrets, "apps");
    let request = test_request_with_duration(Duration::from_secs(3600));

    h.signer.sign(&request, &test_issuer()).await.expect("sign");

    let call = h.client.last_sign_call().expect("client invoked");
    assert_eq!(call.duration, Duration::from_secs(3600));
}

// ============================================================================
// Signing Failures
// ============================================================================

#[tokio::test]
async fn test_pending_certificate_surfaces_retryable_error() {
    let h = harness();
    seed_credentials(&h.secrets, "apps");
    h.client.set_sign_failure(VenafiError::pending("req-17"));

    let err = h.signer.sign(&test_request(), &test_issuer()).await.unwrap_err();

    assert!(matches!(err, SignError::Sign { .. }));
    assert_single_event!(
        h.events,
        ReasonCode::IssuancePending,
        EventSeverity::Warning,
        "venafi certificate still in a pending state, the request will be retried: "
    );
    let event = h.events.last().expect("event recorded");
    assert!(event.message.contains("pickup id req-17"));
}

#[tokio::test]
async fn test_retrieve_timeout_parks_without_error() {
    let h = harness();
    seed_credentials(&h.secrets, "apps");
    h.client.set_sign_failure(VenafiError::retrieve_timeout("req-17"));

    let response = h.signer.sign(&test_request(), &test_issuer()).await.expect("no retry error");

    assert!(response.is_none());
    assert_single_event!(h.events, ReasonCode::Timeout, EventSeverity::Warning);
    let event = h.events.last().expect("event recorded");
    assert_eq!(
        event.message,
        "timed out waiting for venafi certificate, the request will be retried: \
         Timed out retrieving certificate: pickup id req-17"
    );
}

#[tokio::test]
async fn test_connection_failure_retries_as_retrieve() {
    let h = harness();
    seed_credentials(&h.secrets, "apps");
    h.client.set_sign_failure(VenafiError::connection("connection reset"));

    let err = h.signer.sign(&test_request(), &test_issuer()).await.unwrap_err();

    assert!(matches!(err, SignError::Sign { .. }));
    assert_single_event!(h.events, ReasonCode::Retrieve, EventSeverity::Warning);
    let event = h.events.last().expect("event recorded");
    assert_eq!(
        event.message,
        "failed to obtain venafi certificate: Connection error: connection reset"
    );
}

// ============================================================================
// Client Construction Failures
// ============================================================================

#[tokio::test]
async fn test_missing_credentials_secret_parks_without_error() {
    let h = harness();

    let response = h.signer.sign(&test_request(), &test_issuer()).await.expect("no retry error");

    assert!(response.is_none());
    assert!(h.client.sign_calls().is_empty());
    assert_single_event!(h.events, ReasonCode::MissingSecret, EventSeverity::Warning);
    let event = h.events.last().expect("event recorded");
    assert_eq!(
        event.message,
        "Required secret resource not found: \
         Credentials secret not found: apps/tpp-credentials"
    );
}

#[tokio::test]
async fn test_missing_secret_resolves_once_secret_appears() {
    let h = harness();

    for _ in 0..2 {
        let response =
            h.signer.sign(&test_request(), &test_issuer()).await.expect("no retry error");
        assert!(response.is_none());
    }
    assert_eq!(h.events.len(), 2);
    assert!(h.events.events().iter().all(|event| event.reason == ReasonCode::MissingSecret));

    seed_credentials(&h.secrets, "apps");
    let response = h.signer.sign(&test_request(), &test_issuer()).await.expect("sign");

    assert!(response.is_some());
    assert_eq!(h.events.len(), 3);
    assert_eq!(
        h.events.last().map(|event| event.reason),
        Some(ReasonCode::CertificateIssued)
    );
}

#[tokio::test]
async fn test_malformed_credentials_retry_as_client_init() {
    let h = harness();
    h.secrets.insert(
        "apps".into(),
        "tpp-credentials".into(),
        make_secret(&[("note", b"no credentials here")]),
    );

    let err = h.signer.sign(&test_request(), &test_issuer()).await.unwrap_err();

    assert!(matches!(err, SignError::Build { .. }));
    assert_single_event!(
        h.events,
        ReasonCode::VenafiInit,
        EventSeverity::Warning,
        "Failed to initialise venafi client for signing: Invalid credentials secret"
    );
}

#[tokio::test]
async fn test_secret_store_outage_retries_as_client_init() {
    let secrets = FailingSecretStore::new();
    secrets.set_failure(Some(SecretError::connection("secret backend unreachable")));
    let events = Arc::new(RecordingEventSink::new());
    let signer = Signer::builder()
        .secrets(Arc::new(secrets))
        .client_builder(Arc::new(VenafiClientBuilder::new(StaticConnector::ok())))
        .events(events.clone())
        .build();

    let err = signer.sign(&test_request(), &test_issuer()).await.unwrap_err();

    assert!(matches!(err, SignError::Build { .. }));
    assert_single_event!(events, ReasonCode::VenafiInit, EventSeverity::Warning);
    let event = events.last().expect("event recorded");
    assert_eq!(
        event.message,
        "Failed to initialise venafi client for signing: \
         Secret lookup failed: Connection error: secret backend unreachable"
    );
}

#[tokio::test]
async fn test_connector_rejection_retries_as_client_init() {
    let secrets = MemorySecretStore::new();
    seed_credentials(&secrets, "apps");
    let events = Arc::new(RecordingEventSink::new());
    let connector = StaticConnector::failing(VenafiError::connection("tls handshake failed"));
    let signer = Signer::builder()
        .secrets(Arc::new(secrets))
        .client_builder(Arc::new(VenafiClientBuilder::new(connector)))
        .events(events.clone())
        .build();

    let err = signer.sign(&test_request(), &test_issuer()).await.unwrap_err();

    assert!(matches!(err, SignError::Build { .. }));
    assert_single_event!(
        events,
        ReasonCode::VenafiInit,
        EventSeverity::Warning,
        "Failed to initialise venafi client for signing: Client initialization failed"
    );
}

// ============================================================================
// Credential Resolution Scope
// ============================================================================

#[tokio::test]
async fn test_cluster_issuer_resolves_credentials_in_cluster_namespace() {
    let h = harness();
    // present in the request namespace, absent from the cluster one
    seed_credentials(&h.secrets, "apps");
    let request = SigningRequest::builder()
        .namespace("apps")
        .name("web-tls")
        .csr_pem(TEST_CSR_PEM)
        .issuer_ref(IssuerRef::cluster("venafi-global"))
        .build();

    let response = h.signer.sign(&request, &test_cluster_issuer()).await.expect("no retry error");
    assert!(response.is_none());
    let event = h.events.last().expect("event recorded");
    assert!(event.message.contains("certkit/tpp-credentials"));

    seed_credentials(&h.secrets, "certkit");
    let response = h.signer.sign(&request, &test_cluster_issuer()).await.expect("sign");

    assert!(response.is_some());
    assert_eq!(h.events.len(), 2);
    assert_eq!(
        h.events.last().map(|event| event.reason),
        Some(ReasonCode::CertificateIssued)
    );
}

#[tokio::test]
async fn test_cluster_resource_namespace_override() {
    let secrets = MemorySecretStore::new();
    seed_credentials(&secrets, "infra");
    let client = Arc::new(MockVenafiClient::new());
    let events = Arc::new(RecordingEventSink::new());
    let signer = Signer::builder()
        .secrets(Arc::new(secrets))
        .client_builder(Arc::new(VenafiClientBuilder::new(StaticConnector::with_client(
            client.clone(),
        ))))
        .events(events.clone())
        .cluster_resource_namespace("infra")
        .build();

    let response = signer.sign(&test_request(), &test_cluster_issuer()).await.expect("sign");

    assert!(response.is_some());
    assert_eq!(client.sign_calls().len(), 1);
    assert_single_event!(events, ReasonCode::CertificateIssued, EventSeverity::Normal);
}

// ============================================================================
// Resolver Wiring
// ============================================================================

#[tokio::test]
async fn test_resolve_then_sign_flow() {
    let resolver = MemoryIssuerResolver::new();
    resolver.insert(Issuer::namespaced("apps", "venafi-prod", test_tpp_config()));
    let h = harness();
    seed_credentials(&h.secrets, "apps");
    let request = test_request();

    let issuer = resolver
        .resolve(&request.namespace, &request.issuer_ref)
        .await
        .expect("issuer registered");
    let response = h.signer.sign(&request, &issuer).await.expect("sign");

    assert!(response.is_some());
    assert_single_event!(h.events, ReasonCode::CertificateIssued, EventSeverity::Normal);
}
