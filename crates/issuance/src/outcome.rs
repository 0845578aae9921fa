//! Classification of signing failures into outcomes.
//!
//! Every error a signing attempt can produce maps to exactly one
//! [`SignOutcome`]: a state, a stable reason, a fixed operator-facing
//! message, and whether the attempt should be retried. The mapping is the
//! contract between this crate and whatever drives it; callers schedule
//! retries off [`SignOutcome::retries`] alone.
//!
//! Client errors split three ways. A pending certificate retries under
//! [`ReasonCode::IssuancePending`]; a retrieval timeout is terminal under
//! [`ReasonCode::Timeout`]; everything else retries under
//! [`ReasonCode::Retrieve`]. Builder errors split two ways: a missing
//! credentials secret parks the request under
//! [`ReasonCode::MissingSecret`] without signaling retry, and every other
//! construction failure retries under [`ReasonCode::VenafiInit`].

use certkit_venafi::{BuildError, CertificatePem, VenafiError};

use crate::events::{EventSeverity, ReasonCode};

/// Message recorded while the CA still has the request in progress.
pub const PENDING_MESSAGE: &str =
    "venafi certificate still in a pending state, the request will be retried";

/// Message recorded when waiting for the CA gave up.
pub const TIMEOUT_MESSAGE: &str =
    "timed out waiting for venafi certificate, the request will be retried";

/// Message recorded when certificate retrieval failed outright.
pub const RETRIEVE_MESSAGE: &str = "failed to obtain venafi certificate";

/// Message recorded when the credentials secret does not exist.
pub const MISSING_SECRET_MESSAGE: &str = "Required secret resource not found";

/// Message recorded when client construction failed.
pub const CLIENT_INIT_MESSAGE: &str = "Failed to initialise venafi client for signing";

/// Message recorded when a certificate was issued.
pub const ISSUED_MESSAGE: &str = "certificate issued";

/// Outcome of one signing attempt.
///
/// `Pending` covers attempts that may still succeed, with `retry` saying
/// whether the caller should drive the next attempt or wait for an
/// external change. `Failed` is terminal for the attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutcome {
    /// The CA returned a certificate.
    Issued {
        /// The issued certificate chain.
        certificate: CertificatePem,
    },

    /// The attempt did not produce a certificate but may later.
    Pending {
        /// Stable reason identifier.
        reason: ReasonCode,
        /// Fixed operator-facing message.
        message: &'static str,
        /// Whether the caller should retry. `false` parks the request
        /// until something external changes.
        retry: bool,
    },

    /// The attempt is over without a certificate.
    Failed {
        /// Stable reason identifier.
        reason: ReasonCode,
        /// Fixed operator-facing message.
        message: &'static str,
    },
}

impl SignOutcome {
    /// Returns the reason identifier for this outcome.
    #[must_use]
    pub fn reason(&self) -> ReasonCode {
        match self {
            Self::Issued { .. } => ReasonCode::CertificateIssued,
            Self::Pending { reason, .. } | Self::Failed { reason, .. } => *reason,
        }
    }

    /// Returns the audit severity for this outcome.
    #[must_use]
    pub fn severity(&self) -> EventSeverity {
        match self {
            Self::Issued { .. } => EventSeverity::Normal,
            Self::Pending { .. } | Self::Failed { .. } => EventSeverity::Warning,
        }
    }

    /// Returns the operator-facing message for this outcome.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Issued { .. } => ISSUED_MESSAGE,
            Self::Pending { message, .. } | Self::Failed { message, .. } => message,
        }
    }

    /// Returns `true` if the caller should retry the attempt.
    #[must_use]
    pub fn retries(&self) -> bool {
        match self {
            Self::Pending { retry, .. } => *retry,
            Self::Issued { .. } | Self::Failed { .. } => false,
        }
    }
}

/// Maps a client signing error to its outcome.
pub fn classify_sign_error(error: &VenafiError) -> SignOutcome {
    match error {
        VenafiError::CertificatePending { .. } => SignOutcome::Pending {
            reason: ReasonCode::IssuancePending,
            message: PENDING_MESSAGE,
            retry: true,
        },
        VenafiError::RetrieveTimeout { .. } => SignOutcome::Failed {
            reason: ReasonCode::Timeout,
            message: TIMEOUT_MESSAGE,
        },
        _ => SignOutcome::Pending {
            reason: ReasonCode::Retrieve,
            message: RETRIEVE_MESSAGE,
            retry: true,
        },
    }
}

/// Maps a client construction error to its outcome.
///
/// A missing credentials secret does not signal retry. The request stays
/// parked until the secret appears, which is the caller's wake-up signal,
/// not a timer.
pub fn classify_build_error(error: &BuildError) -> SignOutcome {
    match error {
        BuildError::CredentialsNotFound { .. } => SignOutcome::Pending {
            reason: ReasonCode::MissingSecret,
            message: MISSING_SECRET_MESSAGE,
            retry: false,
        },
        _ => SignOutcome::Pending {
            reason: ReasonCode::VenafiInit,
            message: CLIENT_INIT_MESSAGE,
            retry: true,
        },
    }
}
