//! Venafi CA client facade and builder for certkit.
//!
//! This crate connects issuer configuration to a working CA session. It
//! resolves the credentials secret an issuer references, parses it into
//! credential material, and hands both to a transport [`Connector`] that
//! speaks to either product line. Everything above it programs against the
//! two-method [`VenafiClient`] facade and a closed error vocabulary.
//!
//! # Features
//!
//! - **One facade, two products**: TPP and Cloud behind the same trait
//! - **Typed credential parsing**: well-known secret keys, token preferred
//!   over username/password, values wiped on drop
//! - **Closed error vocabulary**: callers classify failures without string
//!   matching
//! - **Pluggable transport**: the [`Connector`] seam swaps the product
//!   handshake for a scripted one in tests
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     certkit-issuance                        │
//! │        Signer │ outcome classification │ audit events       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   VenafiClientBuilder                       │
//! │     credential lookup │ parsing │ ConnectionProfile         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       Connector                             │
//! │          product handshake (TPP VEDSDK / Cloud API)         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      Venafi CA                              │
//! │     policy zones │ certificate issuance │ retrieval         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use certkit_secrets::{MemorySecretStore, Namespace, Secret, SecretSelector};
//! use certkit_venafi::{
//!     ClientBuilder, TppConnection, VenafiClientBuilder, VenafiConfig, VenafiConnection,
//! };
//! # use std::sync::Arc;
//! # use async_trait::async_trait;
//! # use certkit_venafi::{ConnectionProfile, Connector, VenafiClient, VenafiResult};
//! # #[derive(Debug)]
//! # struct VcertConnector;
//! # #[async_trait]
//! # impl Connector for VcertConnector {
//! #     async fn connect(&self, _: ConnectionProfile) -> VenafiResult<Arc<dyn VenafiClient>> {
//! #         unimplemented!()
//! #     }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = VenafiConfig::builder()
//!         .zone(r"TLS\Internal")
//!         .connection(VenafiConnection::Tpp(
//!             TppConnection::builder()
//!                 .url("https://tpp.example.com/vedsdk")
//!                 .credentials_ref(SecretSelector::new("tpp-credentials"))
//!                 .build(),
//!         ))
//!         .build()?;
//!
//!     let secrets = MemorySecretStore::new();
//!     let mut credentials = Secret::new();
//!     credentials.insert("access-token", b"tok".to_vec());
//!     secrets.insert("issuers".into(), "tpp-credentials".into(), credentials);
//!
//!     let builder = VenafiClientBuilder::new(VcertConnector);
//!     let client = builder.build(&Namespace::from("issuers"), &secrets, &config).await?;
//!
//!     let chain = client.sign(b"...csr pem...", std::time::Duration::from_secs(86400)).await?;
//!     println!("issued {} bytes of PEM", chain.len());
//!     Ok(())
//! }
//! ```
//!
//! # Error Vocabulary
//!
//! Runtime failures map onto [`VenafiError`]; construction failures onto
//! [`BuildError`]:
//!
//! | CA condition                          | Variant                              |
//! | ------------------------------------- | ------------------------------------ |
//! | accepted but not signed yet           | [`VenafiError::CertificatePending`]  |
//! | timed out polling for the chain       | [`VenafiError::RetrieveTimeout`]     |
//! | endpoint unreachable                  | [`VenafiError::Connection`]          |
//! | CA rejected the request               | [`VenafiError::Api`]                 |
//! | credentials secret absent             | [`BuildError::CredentialsNotFound`]  |
//! | credentials secret malformed          | [`BuildError::Credentials`]          |
//!
//! # Fail Points
//!
//! With the `failpoints` feature enabled, [`VenafiClientBuilder`] exposes a
//! `builder-before-connect` fail point for injecting connect-time failures
//! in integration tests.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod client;
mod config;
mod credentials;
mod error;

/// Shared test utilities for CA client testing.
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;

/// Client construction from issuer configuration.
pub use builder::{ClientBuilder, ConnectionProfile, Connector, VenafiClientBuilder};
/// The CA client facade and its certificate payload type.
pub use client::{CertificatePem, VenafiClient};
/// Issuer configuration types and the Cloud endpoint default.
pub use config::{
    CloudConnection, DEFAULT_CLOUD_URL, TppConnection, VenafiConfig, VenafiConnection,
};
/// Credential material and the well-known secret keys it is read from.
pub use credentials::{
    CLOUD_API_KEY_KEY, TPP_ACCESS_TOKEN_KEY, TPP_PASSWORD_KEY, TPP_USERNAME_KEY, VenafiCredentials,
};
/// Error types and result alias.
pub use error::{BoxError, BuildError, VenafiError, VenafiResult};
