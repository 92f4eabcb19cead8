//! Service account credentials.

use std::fmt;

use serde::Deserialize;

use crate::PullError;

/// Environment variable holding the service account JSON payload.
pub const CREDENTIALS_ENV: &str = "GDOC_CREDENTIALS";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// A Google service account key.
#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    /// Account address, used as the token issuer
    pub client_email: String,

    /// PEM-encoded RSA private key
    pub private_key: String,

    /// OAuth token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccount {
    /// Parse the JSON key payload.
    pub fn from_json(payload: &str) -> Result<Self, PullError> {
        serde_json::from_str(payload).map_err(|e| PullError::Credentials(e.to_string()))
    }

    /// Parse the payload from an optional environment value.
    ///
    /// `None` means the variable is unset.
    pub fn from_env_value(value: Option<String>) -> Result<Self, PullError> {
        let payload = value.ok_or_else(|| PullError::MissingCredentials(CREDENTIALS_ENV.to_string()))?;
        Self::from_json(&payload)
    }
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
