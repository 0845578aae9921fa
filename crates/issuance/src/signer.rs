//! The signing front door.
//!
//! [`Signer`] owns the collaborators a signing attempt needs: a secret
//! store for credentials, a client builder for CA connections, and an
//! event sink for audit records. One call to [`Signer::sign`] performs
//! one complete attempt and records exactly one audit event, whatever
//! happens.

use std::fmt;
use std::sync::Arc;

use certkit_secrets::{Namespace, SecretStore};
use certkit_venafi::{CertificatePem, ClientBuilder};

use crate::error::{SignError, SignResult};
use crate::events::{AuditEvent, EventSink};
use crate::issuer::Issuer;
use crate::outcome::{SignOutcome, classify_build_error, classify_sign_error};
use crate::request::SigningRequest;

/// Namespace where cluster-wide issuers resolve their credential secrets
/// unless the signer is configured otherwise.
pub const DEFAULT_CLUSTER_RESOURCE_NAMESPACE: &str = "certkit";

/// A successfully issued certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueResponse {
    certificate: CertificatePem,
}

impl IssueResponse {
    /// Wraps an issued certificate.
    #[must_use]
    pub fn new(certificate: CertificatePem) -> Self {
        Self { certificate }
    }

    /// Returns the issued certificate chain.
    #[must_use]
    pub fn certificate(&self) -> &CertificatePem {
        &self.certificate
    }

    /// Consumes the response, returning the certificate.
    #[must_use]
    pub fn into_certificate(self) -> CertificatePem {
        self.certificate
    }
}

/// Drives signing attempts against a CA.
///
/// Construction is explicit dependency injection through the builder;
/// there is no global registry and no hidden state. A `Signer` is cheap
/// to share behind [`Arc`] and every method takes `&self`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use certkit_issuance::Signer;
/// use certkit_secrets::MemorySecretStore;
/// use certkit_venafi::VenafiClientBuilder;
/// # use std::time::Duration;
/// # use async_trait::async_trait;
/// # use certkit_venafi::{ConnectionProfile, Connector, VenafiClient, VenafiResult};
/// # #[derive(Debug, Clone)]
/// # struct VcertConnector;
/// # #[async_trait]
/// # impl Connector for VcertConnector {
/// #     async fn connect(&self, _: ConnectionProfile) -> VenafiResult<Arc<dyn VenafiClient>> {
/// #         unimplemented!()
/// #     }
/// # }
/// use certkit_issuance::TracingEventSink;
///
/// let signer = Signer::builder()
///     .secrets(Arc::new(MemorySecretStore::new()))
///     .client_builder(Arc::new(VenafiClientBuilder::new(VcertConnector)))
///     .events(Arc::new(TracingEventSink::new()))
///     .build();
/// ```
pub struct Signer {
    secrets: Arc<dyn SecretStore>,
    client_builder: Arc<dyn ClientBuilder>,
    events: Arc<dyn EventSink>,
    cluster_resource_namespace: Namespace,
}

#[bon::bon]
impl Signer {
    /// Creates a signer from its collaborators.
    ///
    /// `cluster_resource_namespace` defaults to
    /// [`DEFAULT_CLUSTER_RESOURCE_NAMESPACE`] and only affects
    /// cluster-wide issuers.
    #[builder]
    pub fn new(
        secrets: Arc<dyn SecretStore>,
        client_builder: Arc<dyn ClientBuilder>,
        events: Arc<dyn EventSink>,
        #[builder(into, default = Namespace::from(DEFAULT_CLUSTER_RESOURCE_NAMESPACE))]
        cluster_resource_namespace: Namespace,
    ) -> Self {
        Self {
            secrets,
            client_builder,
            events,
            cluster_resource_namespace,
        }
    }
}

impl Signer {
    /// Returns the namespace cluster-wide issuers resolve credentials in.
    #[must_use]
    pub fn cluster_resource_namespace(&self) -> &Namespace {
        &self.cluster_resource_namespace
    }

    /// Performs one signing attempt for `request` against `issuer`.
    ///
    /// Exactly one audit event is recorded per call, on every path.
    /// Dropping the returned future cancels the attempt; nothing keeps
    /// running past the drop.
    ///
    /// # Contract
    ///
    /// - `Ok(Some(response))` — the CA issued a certificate.
    /// - `Ok(None)` — no certificate and no retry signal. Either the wait
    ///   for the CA timed out, or the credentials secret is missing and
    ///   the request stays parked until the secret appears.
    /// - `Err(_)` — the attempt failed and should be retried with
    ///   backoff.
    #[tracing::instrument(
        skip(self, request, issuer),
        fields(
            namespace = %request.namespace,
            request = %request.name,
            issuer = %issuer.name(),
            kind = %issuer.kind(),
        )
    )]
    pub async fn sign(
        &self,
        request: &SigningRequest,
        issuer: &Issuer,
    ) -> SignResult<Option<IssueResponse>> {
        let namespace = self.resource_namespace(issuer);

        let build = self
            .client_builder
            .build(namespace, self.secrets.as_ref(), issuer.config())
            .await;
        let client = match build {
            Ok(client) => client,
            Err(source) => {
                let outcome = classify_build_error(&source);
                self.record_outcome(request, &outcome, Some(&source)).await;
                return if outcome.retries() {
                    Err(SignError::Build { source })
                } else {
                    Ok(None)
                };
            },
        };

        let duration = request.effective_duration();
        tracing::debug!(duration_secs = duration.as_secs(), "submitting certificate request");

        match client.sign(request.csr_pem.as_ref(), duration).await {
            Ok(certificate) => {
                let outcome = SignOutcome::Issued {
                    certificate: certificate.clone(),
                };
                self.record_outcome(request, &outcome, None).await;
                Ok(Some(IssueResponse::new(certificate)))
            },
            Err(source) => {
                let outcome = classify_sign_error(&source);
                self.record_outcome(request, &outcome, Some(&source)).await;
                if outcome.retries() {
                    Err(SignError::Sign { source })
                } else {
                    Ok(None)
                }
            },
        }
    }

    fn resource_namespace<'a>(&'a self, issuer: &'a Issuer) -> &'a Namespace {
        match issuer.namespace() {
            Some(namespace) => namespace,
            None => &self.cluster_resource_namespace,
        }
    }

    async fn record_outcome(
        &self,
        request: &SigningRequest,
        outcome: &SignOutcome,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) {
        let message = match error {
            Some(error) => format!("{}: {}", outcome.message(), error_chain(error)),
            None => outcome.message().to_string(),
        };

        let event = AuditEvent::builder()
            .severity(outcome.severity())
            .reason(outcome.reason())
            .message(message)
            .namespace(request.namespace.clone())
            .request(request.name.clone())
            .build();
        self.events.record(&event).await;
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("cluster_resource_namespace", &self.cluster_resource_namespace)
            .finish_non_exhaustive()
    }
}

/// Renders an error and its whole source chain, colon-separated.
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
