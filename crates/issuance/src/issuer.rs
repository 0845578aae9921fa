//! Issuer resources and their lookup.
//!
//! An [`Issuer`] pairs a CA configuration with a scope. The scope decides
//! where credential secrets are resolved: namespaced issuers read from
//! their own namespace, cluster issuers from the signer's configured
//! cluster resource namespace.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use certkit_secrets::Namespace;
use certkit_venafi::VenafiConfig;
use parking_lot::RwLock;

use crate::request::{IssuerKind, IssuerName, IssuerRef};

/// Error from issuer lookup.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]`. Match with a wildcard arm to
/// stay compatible with future variants.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum IssuerError {
    /// No issuer exists under the referenced name and kind.
    #[error("Issuer not found: {kind}/{name}")]
    NotFound {
        /// Name that was looked up.
        name: IssuerName,
        /// Scope that was looked up.
        kind: IssuerKind,
    },

    /// The lookup itself failed.
    #[error("Issuer lookup failed: {message}")]
    Lookup {
        /// Description of the failure.
        message: String,
    },
}

impl IssuerError {
    /// Creates a not-found error.
    pub fn not_found(name: impl Into<IssuerName>, kind: IssuerKind) -> Self {
        Self::NotFound { name: name.into(), kind }
    }

    /// Creates a lookup error.
    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup { message: message.into() }
    }
}

/// A CA issuer resource.
///
/// Both variants carry the same [`VenafiConfig`]; they differ only in
/// scope, which the signer uses to pick the credentials namespace.
#[derive(Debug, Clone)]
pub enum Issuer {
    /// Issuer visible to one namespace. Credentials resolve in that
    /// namespace.
    Namespaced {
        /// Namespace the issuer lives in.
        namespace: Namespace,
        /// Name of the issuer.
        name: IssuerName,
        /// CA connection configuration.
        config: VenafiConfig,
    },

    /// Cluster-wide issuer. Credentials resolve in the signer's cluster
    /// resource namespace.
    Cluster {
        /// Name of the issuer.
        name: IssuerName,
        /// CA connection configuration.
        config: VenafiConfig,
    },
}

impl Issuer {
    /// Creates a namespace-scoped issuer.
    pub fn namespaced(
        namespace: impl Into<Namespace>,
        name: impl Into<IssuerName>,
        config: VenafiConfig,
    ) -> Self {
        Self::Namespaced {
            namespace: namespace.into(),
            name: name.into(),
            config,
        }
    }

    /// Creates a cluster-wide issuer.
    pub fn cluster(name: impl Into<IssuerName>, config: VenafiConfig) -> Self {
        Self::Cluster { name: name.into(), config }
    }

    /// Returns the issuer's name.
    #[must_use]
    pub fn name(&self) -> &IssuerName {
        match self {
            Self::Namespaced { name, .. } | Self::Cluster { name, .. } => name,
        }
    }

    /// Returns the CA configuration.
    #[must_use]
    pub fn config(&self) -> &VenafiConfig {
        match self {
            Self::Namespaced { config, .. } | Self::Cluster { config, .. } => config,
        }
    }

    /// Returns the scope of this issuer.
    #[must_use]
    pub fn kind(&self) -> IssuerKind {
        match self {
            Self::Namespaced { .. } => IssuerKind::Issuer,
            Self::Cluster { .. } => IssuerKind::ClusterIssuer,
        }
    }

    /// Returns the namespace for namespace-scoped issuers, `None` for
    /// cluster-wide ones.
    #[must_use]
    pub fn namespace(&self) -> Option<&Namespace> {
        match self {
            Self::Namespaced { namespace, .. } => Some(namespace),
            Self::Cluster { .. } => None,
        }
    }
}

/// Read-only lookup from an issuer reference to the issuer resource.
///
/// Namespaced references resolve within the namespace of the request that
/// carries them; a request can never reach an issuer in a foreign
/// namespace.
#[async_trait]
pub trait IssuerResolver: Send + Sync {
    /// Resolves `issuer_ref` as seen from `request_namespace`.
    async fn resolve(
        &self,
        request_namespace: &Namespace,
        issuer_ref: &IssuerRef,
    ) -> Result<Issuer, IssuerError>;
}

#[derive(Debug, Default)]
struct ResolverInner {
    namespaced: RwLock<HashMap<(Namespace, IssuerName), Issuer>>,
    cluster: RwLock<HashMap<IssuerName, Issuer>>,
}

/// In-memory [`IssuerResolver`] for tests and embedded use.
///
/// Cloning is cheap and clones share the same issuer set.
#[derive(Debug, Clone, Default)]
pub struct MemoryIssuerResolver {
    inner: Arc<ResolverInner>,
}

impl MemoryIssuerResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an issuer, keyed by its scope and name.
    ///
    /// Replaces any issuer previously registered under the same key.
    pub fn insert(&self, issuer: Issuer) {
        match &issuer {
            Issuer::Namespaced { namespace, name, .. } => {
                let key = (namespace.clone(), name.clone());
                self.inner.namespaced.write().insert(key, issuer);
            },
            Issuer::Cluster { name, .. } => {
                self.inner.cluster.write().insert(name.clone(), issuer);
            },
        }
    }
}

#[async_trait]
impl IssuerResolver for MemoryIssuerResolver {
    #[tracing::instrument(
        skip(self),
        fields(namespace = %request_namespace, issuer = %issuer_ref.name, kind = %issuer_ref.kind)
    )]
    async fn resolve(
        &self,
        request_namespace: &Namespace,
        issuer_ref: &IssuerRef,
    ) -> Result<Issuer, IssuerError> {
        let found = match issuer_ref.kind {
            IssuerKind::Issuer => {
                let key = (request_namespace.clone(), issuer_ref.name.clone());
                self.inner.namespaced.read().get(&key).cloned()
            },
            IssuerKind::ClusterIssuer => self.inner.cluster.read().get(&issuer_ref.name).cloned(),
        };

        found.ok_or_else(|| IssuerError::not_found(issuer_ref.name.clone(), issuer_ref.kind))
    }
}
