//! Issuance error types.
//!
//! This module defines the error the signer surfaces to its caller. An
//! error return always means the attempt should be retried; terminal
//! conditions are reported through the signer's return value instead.

use certkit_venafi::{BuildError, VenafiError};
use thiserror::Error;

/// Errors surfaced by [`Signer::sign`](crate::Signer::sign).
///
/// Both variants preserve their source so callers and log sinks can walk
/// the full chain down to the CA or secret-store failure.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]` — new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignError {
    /// CA client construction failed before any signing attempt.
    #[error("Failed to build CA client")]
    Build {
        /// The underlying construction failure.
        #[source]
        source: BuildError,
    },

    /// The CA rejected or could not complete the signing request.
    #[error("CA signing request failed")]
    Sign {
        /// The underlying CA failure.
        #[source]
        source: VenafiError,
    },
}

impl From<BuildError> for SignError {
    fn from(source: BuildError) -> Self {
        SignError::Build { source }
    }
}

impl From<VenafiError> for SignError {
    fn from(source: VenafiError) -> Self {
        SignError::Sign { source }
    }
}

/// Result type alias for signing operations.
pub type SignResult<T> = std::result::Result<T, SignError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SignError::Build { source: BuildError::credentials("missing key") };
        assert_eq!(err.to_string(), "Failed to build CA client");

        let err = SignError::Sign { source: VenafiError::api("zone rejected") };
        assert_eq!(err.to_string(), "CA signing request failed");
    }

    #[test]
    fn test_source_chain_reaches_ca_error() {
        use std::error::Error;

        let err = SignError::Sign { source: VenafiError::pending("req-9") };

        let source = err.source().expect("source preserved");
        assert_eq!(source.to_string(), "Certificate issuance is pending: pickup id req-9");
    }

    #[test]
    fn test_source_chain_reaches_secret_error() {
        use std::error::Error;

        use certkit_secrets::SecretError;

        let build = BuildError::from(SecretError::connection("secret backend unreachable"));
        let err = SignError::from(build);

        // Level 1: SignError -> BuildError
        let level_1 = err.source().expect("level 1 source");
        assert_eq!(level_1.to_string(), "Secret lookup failed");

        // Level 2: BuildError -> SecretError
        let level_2 = level_1.source().expect("level 2 source");
        assert_eq!(level_2.to_string(), "Connection error: secret backend unreachable");
    }

    #[test]
    fn test_from_conversions() {
        let err: SignError = BuildError::credentials("bad utf-8").into();
        assert!(matches!(err, SignError::Build { .. }));

        let err: SignError = VenafiError::retrieve_timeout("req-3").into();
        assert!(matches!(err, SignError::Sign { .. }));
    }
}
