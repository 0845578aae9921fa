//! Credential material extracted from Kubernetes-style secrets.
//!
//! Each connection kind reads a fixed set of well-known keys from its
//! credentials secret. TPP prefers an access token and falls back to
//! username/password; Cloud reads a single API key.

use std::fmt;

use certkit_secrets::{Secret, Zeroizing};

use crate::config::VenafiConnection;
use crate::error::BuildError;

/// Secret key holding the TPP username.
pub const TPP_USERNAME_KEY: &str = "username";

/// Secret key holding the TPP password.
pub const TPP_PASSWORD_KEY: &str = "password";

/// Secret key holding a TPP access token. Preferred over username/password
/// when both are present.
pub const TPP_ACCESS_TOKEN_KEY: &str = "access-token";

/// Default secret key holding the Cloud API key, used when the selector
/// does not name one.
pub const CLOUD_API_KEY_KEY: &str = "api-key";

/// Credential material for one Venafi connection.
///
/// Secret values are held in [`Zeroizing`] wrappers and are wiped on drop.
/// The `Debug` impl redacts them.
#[derive(Clone)]
pub enum VenafiCredentials {
    /// TPP access token authentication.
    TppToken {
        /// OAuth access token.
        access_token: Zeroizing<String>,
    },
    /// TPP username/password authentication.
    TppBasic {
        /// Account username.
        username: String,
        /// Account password.
        password: Zeroizing<String>,
    },
    /// Venafi Cloud API key authentication.
    CloudApiKey {
        /// API key.
        api_key: Zeroizing<String>,
    },
}

impl VenafiCredentials {
    /// Extracts credentials from a secret according to the connection kind.
    ///
    /// For TPP connections the `access-token` key wins when present;
    /// otherwise both `username` and `password` must be set. For Cloud
    /// connections the selector's key is read, defaulting to `api-key`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Credentials`] when the expected keys are
    /// absent or a value is not valid UTF-8.
    pub fn from_secret(connection: &VenafiConnection, secret: &Secret) -> Result<Self, BuildError> {
        match connection {
            VenafiConnection::Tpp(_) => {
                if let Some(token) = secret.get(TPP_ACCESS_TOKEN_KEY) {
                    return Ok(Self::TppToken {
                        access_token: utf8_value(TPP_ACCESS_TOKEN_KEY, token)?,
                    });
                }

                let username = secret.get(TPP_USERNAME_KEY).ok_or_else(|| {
                    BuildError::credentials(format!(
                        "secret must contain {TPP_ACCESS_TOKEN_KEY:?} or both \
                         {TPP_USERNAME_KEY:?} and {TPP_PASSWORD_KEY:?}"
                    ))
                })?;
                let password = secret.get(TPP_PASSWORD_KEY).ok_or_else(|| {
                    BuildError::credentials(format!(
                        "secret contains {TPP_USERNAME_KEY:?} but not {TPP_PASSWORD_KEY:?}"
                    ))
                })?;

                Ok(Self::TppBasic {
                    username: utf8_value(TPP_USERNAME_KEY, username)?.to_string(),
                    password: utf8_value(TPP_PASSWORD_KEY, password)?,
                })
            },
            VenafiConnection::Cloud(cloud) => {
                let key = cloud.api_token_ref.key.as_deref().unwrap_or(CLOUD_API_KEY_KEY);
                let api_key = secret.get(key).ok_or_else(|| {
                    BuildError::credentials(format!("secret is missing key {key:?}"))
                })?;

                Ok(Self::CloudApiKey { api_key: utf8_value(key, api_key)? })
            },
        }
    }

    /// Returns a short label for the authentication scheme, for logging.
    #[must_use]
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::TppToken { .. } => "tpp-token",
            Self::TppBasic { .. } => "tpp-basic",
            Self::CloudApiKey { .. } => "cloud-api-key",
        }
    }
}

impl fmt::Debug for VenafiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TppToken { .. } => {
                f.debug_struct("TppToken").field("access_token", &"<redacted>").finish()
            },
            Self::TppBasic { username, .. } => f
                .debug_struct("TppBasic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::CloudApiKey { .. } => {
                f.debug_struct("CloudApiKey").field("api_key", &"<redacted>").finish()
            },
        }
    }
}

fn utf8_value(key: &str, value: &[u8]) -> Result<Zeroizing<String>, BuildError> {
    let text = std::str::from_utf8(value).map_err(|_| {
        BuildError::credentials(format!("secret value for key {key:?} is not valid UTF-8"))
    })?;
    Ok(Zeroizing::new(text.to_string()))
}
