use serde::Deserialize;
use thiserror::Error;

use crate::domain::models::UserId;

/// Claims returned by the identity provider for a verified access token.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityClaims {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid or expired access token")]
    InvalidToken,
    #[error("identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity provider error ({0})")]
    Provider(u16),
}

/// Client for the external identity provider. The provider owns the whole
/// credential lifecycle; this service only exchanges a provider-issued
/// access token for the caller's identity id.
pub struct IdentityClient {
    http: reqwest::Client,
    auth_url: String,
    api_key: String,
}

impl IdentityClient {
    pub fn new(auth_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub async fn verify_token(&self, access_token: &str) -> Result<IdentityClaims, IdentityError> {
        let response = self
            .http
            .get(format!("{}/user", self.auth_url))
            .bearer_auth(access_token)
            .header("apikey", &self.api_key)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<IdentityClaims>().await?),
            status if status.as_u16() == 401 || status.as_u16() == 403 => {
                Err(IdentityError::InvalidToken)
            }
            status => Err(IdentityError::Provider(status.as_u16())),
        }
    }
}
