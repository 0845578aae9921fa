//! Client construction from issuer configuration.
//!
//! This module turns a [`VenafiConfig`] plus the credentials secret it
//! references into a ready [`VenafiClient`]. Credential lookup and parsing
//! live here; the product handshake itself sits behind the [`Connector`]
//! seam so tests and alternative transports can slot in.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use certkit_secrets::{Namespace, SecretStore};
use fail::fail_point;

use crate::client::VenafiClient;
use crate::config::{VenafiConfig, VenafiConnection};
use crate::credentials::VenafiCredentials;
use crate::error::{BuildError, VenafiResult};

/// Builds a CA client for one issuer configuration.
///
/// # Failure Classes
///
/// [`build`](Self::build) separates two kinds of failure so callers can
/// react differently:
///
/// - [`BuildError::CredentialsNotFound`]: the referenced secret does not
///   exist yet. Callers typically wait for the secret to appear instead of
///   retrying.
/// - Everything else: malformed credentials, secret backend trouble, or a
///   failed handshake. Callers typically retry these.
#[async_trait]
pub trait ClientBuilder: Send + Sync {
    /// Resolves credentials from `secrets` and connects a client.
    ///
    /// # Arguments
    ///
    /// * `namespace` - Namespace the credentials secret lives in.
    /// * `secrets` - Store to resolve the secret against.
    /// * `config` - Issuer configuration naming zone, endpoint, and the
    ///   credentials secret.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] as described on the trait.
    async fn build(
        &self,
        namespace: &Namespace,
        secrets: &dyn SecretStore,
        config: &VenafiConfig,
    ) -> Result<Arc<dyn VenafiClient>, BuildError>;
}

/// Everything a [`Connector`] needs to open one CA session.
///
/// The profile is the canonical form of a [`VenafiConfig`] with the
/// credentials secret already resolved. The `Debug` impl inherits the
/// credential redaction from [`VenafiCredentials`].
#[derive(Debug, Clone)]
pub struct ConnectionProfile {
    /// Policy zone certificates are issued under.
    pub zone: String,

    /// CA endpoint URL, with the Cloud default already applied.
    pub url: String,

    /// Parsed credential material.
    pub credentials: VenafiCredentials,

    /// PEM bundle to trust for the server certificate, when set.
    pub ca_bundle: Option<Vec<u8>>,

    /// Per-request timeout covering submit plus retrieval.
    pub request_timeout: Duration,
}

/// Opens a CA session from a [`ConnectionProfile`].
///
/// This is the transport seam. The production connector speaks the product
/// protocol; tests substitute a scripted one.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establishes a session and returns the client for it.
    ///
    /// # Errors
    ///
    /// Returns [`VenafiError`](crate::VenafiError) when the endpoint is
    /// unreachable or rejects the credentials.
    async fn connect(&self, profile: ConnectionProfile) -> VenafiResult<Arc<dyn VenafiClient>>;
}

/// Standard [`ClientBuilder`] implementation over a [`Connector`].
///
/// # Example
///
/// ```no_run
/// use certkit_secrets::{MemorySecretStore, Namespace};
/// use certkit_venafi::{ClientBuilder, VenafiClientBuilder, VenafiConfig};
/// # use std::sync::Arc;
/// # use async_trait::async_trait;
/// # use certkit_venafi::{ConnectionProfile, Connector, VenafiClient, VenafiResult};
/// # #[derive(Debug)]
/// # struct MyConnector;
/// # #[async_trait]
/// # impl Connector for MyConnector {
/// #     async fn connect(&self, _: ConnectionProfile) -> VenafiResult<Arc<dyn VenafiClient>> {
/// #         unimplemented!()
/// #     }
/// # }
/// # async fn example(config: VenafiConfig) -> Result<(), Box<dyn std::error::Error>> {
/// let builder = VenafiClientBuilder::new(MyConnector);
/// let secrets = MemorySecretStore::new();
/// let namespace = Namespace::from("issuers");
///
/// let client = builder.build(&namespace, &secrets, &config).await?;
/// client.ping().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct VenafiClientBuilder<C> {
    connector: C,
}

impl<C> VenafiClientBuilder<C> {
    /// Creates a builder over the given connector.
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Returns the connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }
}

#[async_trait]
impl<C: Connector> ClientBuilder for VenafiClientBuilder<C> {
    #[tracing::instrument(
        skip(self, secrets, config),
        fields(namespace = %namespace, zone = config.zone()),
    )]
    async fn build(
        &self,
        namespace: &Namespace,
        secrets: &dyn SecretStore,
        config: &VenafiConfig,
    ) -> Result<Arc<dyn VenafiClient>, BuildError> {
        let selector = config.connection().credentials_ref();

        let secret = secrets.get_secret(namespace, &selector.name).await?;
        let credentials = VenafiCredentials::from_secret(config.connection(), &secret)?;

        tracing::debug!(scheme = credentials.scheme(), url = config.connection().url(),
            "Resolved CA credentials");

        fail_point!("builder-before-connect", |_| {
            Err(crate::error::VenafiError::connection("injected failure before connect").into())
        });

        let ca_bundle = match config.connection() {
            VenafiConnection::Tpp(tpp) => tpp.ca_bundle.clone(),
            VenafiConnection::Cloud(_) => None,
        };

        let profile = ConnectionProfile {
            zone: config.zone().to_string(),
            url: config.connection().url().to_string(),
            credentials,
            ca_bundle,
            request_timeout: config.request_timeout(),
        };

        let client = self.connector.connect(profile).await?;
        Ok(client)
    }
}
