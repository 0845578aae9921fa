//! Audit events for signing outcomes.
//!
//! Every call to [`Signer::sign`](crate::signer::Signer::sign) records
//! exactly one [`AuditEvent`], whatever the outcome. Events are
//! observability output only; recording one never changes a signing
//! result, and sinks are infallible from the caller's view.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use certkit_secrets::Namespace;
use chrono::{DateTime, Utc};

/// Severity of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSeverity {
    /// Expected outcome.
    Normal,
    /// Degraded or failed outcome.
    Warning,
}

impl EventSeverity {
    /// Returns the severity as its canonical string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Warning => "Warning",
        }
    }
}

impl fmt::Display for EventSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable reason attached to every audit event.
///
/// The strings returned by [`ReasonCode::as_str`] are stable public
/// identifiers. External tooling filters on them, so they never change,
/// even where they diverge from the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonCode {
    /// Certificate issued and returned to the caller.
    CertificateIssued,
    /// CA accepted the request but has not produced a certificate yet.
    IssuancePending,
    /// Gave up waiting for the CA to produce a certificate.
    Timeout,
    /// Certificate retrieval failed.
    Retrieve,
    /// Credentials secret does not exist.
    MissingSecret,
    /// CA client construction failed.
    VenafiInit,
}

impl ReasonCode {
    /// Returns the stable identifier for this reason.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CertificateIssued => "CertificateIssued",
            Self::IssuancePending => "IssuancePending",
            Self::Timeout => "Timeout",
            Self::Retrieve => "Retrieve",
            Self::MissingSecret => "MissingSecret",
            Self::VenafiInit => "ErrorVenafiInit",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record describing the outcome of a signing attempt.
///
/// Carries the coordinates of the originating request so downstream
/// consumers can correlate events without extra context.
#[derive(Debug, Clone, bon::Builder)]
pub struct AuditEvent {
    /// When the outcome was recorded.
    #[builder(default = Utc::now())]
    pub timestamp: DateTime<Utc>,

    /// Severity of the outcome.
    pub severity: EventSeverity,

    /// Stable reason identifier.
    pub reason: ReasonCode,

    /// Human-readable description. Failure events append the underlying
    /// error as `"{message}: {error}"`.
    #[builder(into)]
    pub message: String,

    /// Namespace of the originating request.
    #[builder(into)]
    pub namespace: Namespace,

    /// Name of the originating request.
    #[builder(into)]
    pub request: String,
}

/// Destination for audit events.
///
/// Recording is infallible by contract: a sink that can fail internally
/// must absorb the failure (log it, drop the event) rather than surface
/// it, so that observability problems never alter signing outcomes.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Records one event.
    async fn record(&self, event: &AuditEvent);
}

#[async_trait]
impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    async fn record(&self, event: &AuditEvent) {
        (**self).record(event).await;
    }
}

/// [`EventSink`] that emits events as `audit_event` tracing records,
/// info for [`EventSeverity::Normal`] and warn for
/// [`EventSeverity::Warning`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    /// Creates the sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventSink for TracingEventSink {
    async fn record(&self, event: &AuditEvent) {
        match event.severity {
            EventSeverity::Normal => {
                tracing::info!(
                    target: "audit_event",
                    reason = event.reason.as_str(),
                    namespace = %event.namespace,
                    request = %event.request,
                    "{}",
                    event.message,
                );
            },
            EventSeverity::Warning => {
                tracing::warn!(
                    target: "audit_event",
                    reason = event.reason.as_str(),
                    namespace = %event.namespace,
                    request = %event.request,
                    "{}",
                    event.message,
                );
            },
        }
    }
}

/// [`EventSink`] that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl NoopEventSink {
    /// Creates the sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventSink for NoopEventSink {
    async fn record(&self, _event: &AuditEvent) {}
}
