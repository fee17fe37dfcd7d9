//! External identity provider (Google Sign-In).

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Identity asserted by the external provider for a verified token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalIdentity {
    /// Provider-scoped stable user ID (`sub`).
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The token is malformed, expired, or issued for another client.
    #[error("token rejected: {0}")]
    Rejected(String),
    /// The provider could not be reached or answered unexpectedly.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Maps an opaque provider token to the identity it asserts.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, IdentityError>;
}

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Verifies Google ID tokens against Google's `tokeninfo` endpoint.
pub struct GoogleIdentityVerifier {
    client: reqwest::Client,
    client_id: String,
    endpoint: String,
}

impl GoogleIdentityVerifier {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.into(),
            endpoint: TOKENINFO_URL.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct TokenInfo {
    iss: String,
    aud: String,
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<serde_json::Value>,
    name: Option<String>,
    picture: Option<String>,
}

impl TokenInfo {
    fn email_is_verified(&self) -> bool {
        match &self.email_verified {
            Some(serde_json::Value::Bool(v)) => *v,
            Some(serde_json::Value::String(s)) => s == "true",
            _ => false,
        }
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, IdentityError> {
        if self.client_id.is_empty() {
            return Err(IdentityError::Unavailable(
                "google sign-in is not configured".into(),
            ));
        }

        let res = self
            .client
            .get(&self.endpoint)
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        let status = res.status();
        if status.is_client_error() {
            return Err(IdentityError::Rejected(format!("tokeninfo returned {status}")));
        }
        if !status.is_success() {
            return Err(IdentityError::Unavailable(format!(
                "tokeninfo returned {status}"
            )));
        }

        let info: TokenInfo = res
            .json()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("malformed tokeninfo: {e}")))?;

        if info.aud != self.client_id {
            return Err(IdentityError::Rejected("audience mismatch".into()));
        }
        if !GOOGLE_ISSUERS.contains(&info.iss.as_str()) {
            return Err(IdentityError::Rejected(format!("unexpected issuer {}", info.iss)));
        }
        if !info.email_is_verified() {
            return Err(IdentityError::Rejected("email not verified".into()));
        }
        let email = info
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| IdentityError::Rejected("token carries no email".into()))?;

        Ok(ExternalIdentity {
            subject: info.sub,
            email,
            name: info.name,
            picture: info.picture,
        })
    }
}
