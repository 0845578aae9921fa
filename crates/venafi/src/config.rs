//! Configuration for Venafi-backed issuers.
//!
//! This module provides [`VenafiConfig`], which names the CA zone to issue
//! from and how to reach the CA — either a self-hosted TPP instance or the
//! hosted Venafi Cloud service.

use std::time::Duration;

use certkit_secrets::SecretSelector;
use serde::{Deserialize, Serialize};

use crate::error::{VenafiError, VenafiResult};

/// Default request timeout (60 seconds).
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Default Venafi Cloud API endpoint, used when a cloud connection does not
/// name one explicitly.
pub const DEFAULT_CLOUD_URL: &str = "https://api.venafi.cloud/v1";

/// Configuration for one Venafi issuer.
///
/// A config pairs a policy zone with a connection. The zone determines which
/// policy folder (TPP) or project zone (Cloud) certificates are issued
/// under; the connection carries the endpoint and a reference to the
/// credentials secret.
///
/// # Example
///
/// ```no_run
/// use certkit_secrets::SecretSelector;
/// use certkit_venafi::{TppConnection, VenafiConfig, VenafiConnection};
///
/// let config = VenafiConfig::builder()
///     .zone(r"TLS\Internal")
///     .connection(VenafiConnection::Tpp(
///         TppConnection::builder()
///             .url("https://tpp.example.com/vedsdk")
///             .credentials_ref(SecretSelector::new("tpp-credentials"))
///             .build(),
///     ))
///     .build()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VenafiConfig {
    /// Policy zone certificates are issued under.
    pub(crate) zone: String,

    /// How to reach the CA.
    pub(crate) connection: VenafiConnection,

    /// Per-request timeout covering submit plus retrieval.
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub(crate) request_timeout: Duration,
}

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

/// Connection settings for one of the two Venafi product lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenafiConnection {
    /// Self-hosted Trust Protection Platform.
    Tpp(TppConnection),
    /// Hosted Venafi Cloud.
    Cloud(CloudConnection),
}

impl VenafiConnection {
    /// Returns the reference to the credentials secret for this connection.
    #[must_use]
    pub fn credentials_ref(&self) -> &SecretSelector {
        match self {
            Self::Tpp(tpp) => &tpp.credentials_ref,
            Self::Cloud(cloud) => &cloud.api_token_ref,
        }
    }

    /// Returns the CA endpoint URL, applying the Cloud default when the
    /// connection does not name one.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Tpp(tpp) => &tpp.url,
            Self::Cloud(cloud) => cloud.url.as_deref().unwrap_or(DEFAULT_CLOUD_URL),
        }
    }
}

/// Connection settings for a TPP instance.
#[derive(Debug, Clone, bon::Builder, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TppConnection {
    /// VEDSDK base URL of the TPP instance.
    #[builder(into)]
    pub url: String,

    /// Secret holding either an access token or username/password.
    pub credentials_ref: SecretSelector,

    /// PEM bundle to trust when verifying the TPP server certificate.
    ///
    /// Set programmatically; not part of the serialized config.
    #[serde(skip)]
    pub ca_bundle: Option<Vec<u8>>,
}

/// Connection settings for Venafi Cloud.
#[derive(Debug, Clone, bon::Builder, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloudConnection {
    /// API base URL. Defaults to [`DEFAULT_CLOUD_URL`] when absent.
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Secret holding the API key.
    pub api_token_ref: SecretSelector,
}

#[bon::bon]
impl VenafiConfig {
    /// Creates a new configuration, validating all required fields.
    ///
    /// # Arguments
    ///
    /// * `zone` - Policy zone to issue under. Must be non-empty.
    /// * `connection` - TPP or Cloud connection settings.
    ///
    /// # Optional Fields
    ///
    /// * `request_timeout` - Per-request timeout (default: 60 seconds).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The zone is empty
    /// - A TPP connection has an empty URL
    #[builder]
    pub fn new(
        #[builder(into)] zone: String,
        connection: VenafiConnection,
        #[builder(default = DEFAULT_REQUEST_TIMEOUT)] request_timeout: Duration,
    ) -> VenafiResult<Self> {
        if zone.is_empty() {
            return Err(VenafiError::invalid_config("zone cannot be empty"));
        }

        if let VenafiConnection::Tpp(tpp) = &connection
            && tpp.url.is_empty()
        {
            return Err(VenafiError::invalid_config("TPP URL cannot be empty"));
        }

        Ok(Self { zone, connection, request_timeout })
    }

    /// Returns the policy zone.
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Returns the connection settings.
    #[must_use]
    pub fn connection(&self) -> &VenafiConnection {
        &self.connection
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn tpp_connection() -> VenafiConnection {
        VenafiConnection::Tpp(
            TppConnection::builder()
                .url("https://tpp.example.com/vedsdk")
                .credentials_ref(SecretSelector::new("tpp-credentials"))
                .build(),
        )
    }

    fn cloud_connection() -> VenafiConnection {
        VenafiConnection::Cloud(
            CloudConnection::builder().api_token_ref(SecretSelector::new("cloud-token")).build(),
        )
    }

    #[test]
    fn test_valid_tpp_config() {
        let config =
            VenafiConfig::builder().zone(r"TLS\Internal").connection(tpp_connection()).build();

        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.zone(), r"TLS\Internal");
        assert_eq!(config.connection().url(), "https://tpp.example.com/vedsdk");
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_valid_cloud_config() {
        let config = VenafiConfig::builder()
            .zone("Default Project\\Default Zone")
            .connection(cloud_connection())
            .build()
            .unwrap();

        assert_eq!(config.connection().credentials_ref().name.as_str(), "cloud-token");
    }

    #[test]
    fn test_validation_empty_zone() {
        let result = VenafiConfig::builder().zone("").connection(tpp_connection()).build();

        assert!(matches!(result, Err(VenafiError::InvalidConfig { .. })));
    }

    #[test]
    fn test_validation_empty_tpp_url() {
        let connection = VenafiConnection::Tpp(
            TppConnection::builder()
                .url("")
                .credentials_ref(SecretSelector::new("tpp-credentials"))
                .build(),
        );
        let result = VenafiConfig::builder().zone("zone").connection(connection).build();

        assert!(matches!(result, Err(VenafiError::InvalidConfig { .. })));
    }

    #[test]
    fn test_custom_request_timeout() {
        let config = VenafiConfig::builder()
            .zone("zone")
            .connection(tpp_connection())
            .request_timeout(Duration::from_secs(120))
            .build()
            .unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_cloud_url_defaults() {
        let config =
            VenafiConfig::builder().zone("zone").connection(cloud_connection()).build().unwrap();

        assert_eq!(config.connection().url(), DEFAULT_CLOUD_URL);
    }

    #[test]
    fn test_cloud_url_override() {
        let connection = VenafiConnection::Cloud(
            CloudConnection::builder()
                .url("https://api.venafi.eu/v1")
                .api_token_ref(SecretSelector::new("cloud-token"))
                .build(),
        );
        let config = VenafiConfig::builder().zone("zone").connection(connection).build().unwrap();

        assert_eq!(config.connection().url(), "https://api.venafi.eu/v1");
    }

    #[test]
    fn test_credentials_ref_per_connection_kind() {
        let tpp = tpp_connection();
        assert_eq!(tpp.credentials_ref().name.as_str(), "tpp-credentials");

        let cloud = cloud_connection();
        assert_eq!(cloud.credentials_ref().name.as_str(), "cloud-token");
    }

    #[test]
    fn test_config_deserialization_with_defaults() {
        // request_timeout is absent, so default_request_timeout applies
        let json = r#"{
            "zone": "TLS\\Internal",
            "connection": {
                "tpp": {
                    "url": "https://tpp.example.com/vedsdk",
                    "credentials_ref": {"name": "tpp-credentials"}
                }
            }
        }"#;

        let config: VenafiConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.zone, "TLS\\Internal");
    }

    #[test]
    fn test_config_deserialization_humantime() {
        let json = r#"{
            "zone": "z",
            "connection": {
                "cloud": {"api_token_ref": {"name": "cloud-token", "key": "token"}}
            },
            "request_timeout": "90s"
        }"#;

        let config: VenafiConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.request_timeout, Duration::from_secs(90));
        assert_eq!(config.connection().credentials_ref().key.as_deref(), Some("token"));
    }
}
