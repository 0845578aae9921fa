//! Shared test utilities for CA client testing.
//!
//! This module provides a scripted [`VenafiClient`], a scripted
//! [`Connector`], and ready-made issuer configurations. It is feature-gated
//! behind `testutil` to prevent leaking into production builds.
//!
//! # Usage
//!
//! In integration tests, enable the feature in `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! certkit-venafi = { path = "../venafi", features = ["testutil"] }
//! ```
//!
//! Then import helpers:
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use certkit_venafi::testutil::{MockVenafiClient, StaticConnector, test_tpp_config};
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use certkit_secrets::{Secret, SecretSelector};
use parking_lot::Mutex;

use crate::builder::{ConnectionProfile, Connector};
use crate::client::{CertificatePem, VenafiClient};
use crate::config::{CloudConnection, TppConnection, VenafiConfig, VenafiConnection};
use crate::error::{VenafiError, VenafiResult};

/// PEM blob returned by [`MockVenafiClient`] unless overridden.
pub const TEST_CERT_PEM: &[u8] =
    b"-----BEGIN CERTIFICATE-----\nTUlJQnRlc3RjZXJ0\n-----END CERTIFICATE-----\n";

/// One recorded [`VenafiClient::sign`] invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignCall {
    /// CSR bytes the caller submitted.
    pub csr_pem: Vec<u8>,
    /// Lifetime the caller requested.
    pub duration: Duration,
}

/// Rebuilds an error value for repeated injection.
///
/// Error variants are not `Clone` because they can carry trait-object
/// sources, so mocks rebuild an equivalent value instead. Sources are
/// dropped in the process.
fn rebuild_error(error: &VenafiError) -> VenafiError {
    match error {
        VenafiError::CertificatePending { pickup_id, status } => match status {
            Some(status) => VenafiError::pending_with_status(pickup_id.clone(), status.clone()),
            None => VenafiError::pending(pickup_id.clone()),
        },
        VenafiError::RetrieveTimeout { pickup_id } => {
            VenafiError::retrieve_timeout(pickup_id.clone())
        },
        VenafiError::Connection { message, .. } => VenafiError::connection(message.clone()),
        VenafiError::Api { message } => VenafiError::api(message.clone()),
        VenafiError::InvalidConfig { message } => VenafiError::invalid_config(message.clone()),
    }
}

/// Scripted [`VenafiClient`] that records every call.
///
/// By default every `sign` call succeeds with [`TEST_CERT_PEM`]. Configure
/// a failure with [`set_sign_failure`](Self::set_sign_failure); it then
/// applies to every subsequent call until cleared.
#[derive(Debug)]
pub struct MockVenafiClient {
    pem: CertificatePem,
    sign_failure: Mutex<Option<VenafiError>>,
    ping_failure: Mutex<Option<VenafiError>>,
    calls: Mutex<Vec<SignCall>>,
}

impl MockVenafiClient {
    /// Creates a client that signs everything with [`TEST_CERT_PEM`].
    #[must_use]
    pub fn new() -> Self {
        Self::issuing(TEST_CERT_PEM.to_vec())
    }

    /// Creates a client that signs everything with the given PEM.
    #[must_use]
    pub fn issuing(pem: impl Into<CertificatePem>) -> Self {
        Self {
            pem: pem.into(),
            sign_failure: Mutex::new(None),
            ping_failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a client whose `sign` always fails with the given error.
    #[must_use]
    pub fn failing(error: VenafiError) -> Self {
        let client = Self::new();
        client.set_sign_failure(error);
        client
    }

    /// Makes subsequent `sign` calls fail with the given error.
    pub fn set_sign_failure(&self, error: VenafiError) {
        *self.sign_failure.lock() = Some(error);
    }

    /// Clears an injected `sign` failure.
    pub fn clear_sign_failure(&self) {
        *self.sign_failure.lock() = None;
    }

    /// Makes subsequent `ping` calls fail with the given error.
    pub fn set_ping_failure(&self, error: VenafiError) {
        *self.ping_failure.lock() = Some(error);
    }

    /// Returns every recorded `sign` call, oldest first.
    #[must_use]
    pub fn sign_calls(&self) -> Vec<SignCall> {
        self.calls.lock().clone()
    }

    /// Returns the most recent `sign` call.
    #[must_use]
    pub fn last_sign_call(&self) -> Option<SignCall> {
        self.calls.lock().last().cloned()
    }
}

impl Default for MockVenafiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VenafiClient for MockVenafiClient {
    async fn sign(&self, csr_pem: &[u8], duration: Duration) -> VenafiResult<CertificatePem> {
        self.calls.lock().push(SignCall { csr_pem: csr_pem.to_vec(), duration });

        if let Some(error) = self.sign_failure.lock().as_ref() {
            return Err(rebuild_error(error));
        }
        Ok(self.pem.clone())
    }

    async fn ping(&self) -> VenafiResult<()> {
        if let Some(error) = self.ping_failure.lock().as_ref() {
            return Err(rebuild_error(error));
        }
        Ok(())
    }
}

/// Scripted [`Connector`] that hands out one shared [`MockVenafiClient`].
///
/// Records the last [`ConnectionProfile`] it was asked to connect with, so
/// tests can assert on credential resolution without a live CA.
#[derive(Debug)]
pub struct StaticConnector {
    client: Arc<MockVenafiClient>,
    connect_failure: Mutex<Option<VenafiError>>,
    last_profile: Mutex<Option<ConnectionProfile>>,
}

impl StaticConnector {
    /// Creates a connector whose client signs everything successfully.
    #[must_use]
    pub fn ok() -> Self {
        Self::with_client(Arc::new(MockVenafiClient::new()))
    }

    /// Creates a connector handing out the given client.
    #[must_use]
    pub fn with_client(client: Arc<MockVenafiClient>) -> Self {
        Self { client, connect_failure: Mutex::new(None), last_profile: Mutex::new(None) }
    }

    /// Creates a connector whose `connect` always fails with the given error.
    #[must_use]
    pub fn failing(error: VenafiError) -> Self {
        let connector = Self::ok();
        *connector.connect_failure.lock() = Some(error);
        connector
    }

    /// Returns the shared mock client.
    #[must_use]
    pub fn client(&self) -> Arc<MockVenafiClient> {
        Arc::clone(&self.client)
    }

    /// Returns the profile from the most recent `connect` call.
    #[must_use]
    pub fn last_profile(&self) -> Option<ConnectionProfile> {
        self.last_profile.lock().clone()
    }
}

#[async_trait]
impl Connector for StaticConnector {
    async fn connect(&self, profile: ConnectionProfile) -> VenafiResult<Arc<dyn VenafiClient>> {
        *self.last_profile.lock() = Some(profile);

        if let Some(error) = self.connect_failure.lock().as_ref() {
            return Err(rebuild_error(error));
        }
        Ok(Arc::clone(&self.client) as Arc<dyn VenafiClient>)
    }
}

/// Returns a TPP issuer configuration pointing at `tpp-credentials`.
///
/// # Panics
///
/// Panics if config validation fails (should not happen with these fixed
/// values).
#[must_use]
pub fn test_tpp_config() -> VenafiConfig {
    VenafiConfig::builder()
        .zone(r"TLS\Internal")
        .connection(VenafiConnection::Tpp(
            TppConnection::builder()
                .url("https://tpp.example.com/vedsdk")
                .credentials_ref(SecretSelector::new("tpp-credentials"))
                .build(),
        ))
        .build()
        .expect("valid TPP test config")
}

/// Returns a Cloud issuer configuration pointing at `cloud-token`.
///
/// # Panics
///
/// Panics if config validation fails (should not happen with these fixed
/// values).
#[must_use]
pub fn test_cloud_config() -> VenafiConfig {
    VenafiConfig::builder()
        .zone("Default")
        .connection(VenafiConnection::Cloud(
            CloudConnection::builder().api_token_ref(SecretSelector::new("cloud-token")).build(),
        ))
        .build()
        .expect("valid Cloud test config")
}

/// Returns a TPP credentials secret holding an access token.
#[must_use]
pub fn tpp_token_secret() -> Secret {
    let mut secret = Secret::new();
    secret.insert("access-token", b"test-access-token".to_vec());
    secret
}

/// Returns a TPP credentials secret holding username and password.
#[must_use]
pub fn tpp_basic_secret() -> Secret {
    let mut secret = Secret::new();
    secret.insert("username", b"test-user".to_vec());
    secret.insert("password", b"test-password".to_vec());
    secret
}

/// Returns a Cloud credentials secret holding an API key.
#[must_use]
pub fn cloud_api_key_secret() -> Secret {
    let mut secret = Secret::new();
    secret.insert("api-key", b"test-api-key".to_vec());
    secret
}
