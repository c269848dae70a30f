//! OAuth2 authorization-code exchange against an external identity provider.
//!
//! 1. `POST token_url` (form encoded) exchanges the code for an access token.
//! 2. `GET profile_url` with the bearer token returns the user profile.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::{
    DEFAULT_AVATAR_URL, IdentityExchange, IdentityExchangeError, IdentityProfile, IdentityRequest,
};

/// Identity provider settings
#[derive(Debug)]
pub struct OAuthIdentityConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    /// Used when the request does not carry its own redirect URI
    pub redirect_uri: String,
    pub token_url: String,
    pub profile_url: String,
    /// Avatar images are served from `<avatar_base_url>/<user id>/<avatar hash>.png`
    pub avatar_base_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    username: Option<String>,
    id: Option<String>,
    avatar: Option<String>,
}

pub struct OAuthIdentityExchange {
    http: reqwest::Client,
    config: OAuthIdentityConfig,
}

impl OAuthIdentityExchange {
    pub fn new(http: reqwest::Client, config: OAuthIdentityConfig) -> Self {
        Self { http, config }
    }

    async fn request_token(&self, request: &IdentityRequest) -> Result<String, IdentityExchangeError> {
        let redirect_uri = request
            .redirect_uri
            .as_deref()
            .unwrap_or(&self.config.redirect_uri);
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose_secret()),
            ("code", request.code.as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| IdentityExchangeError::TokenExchange(e.to_string()))?
            .error_for_status()
            .map_err(|e| IdentityExchangeError::TokenExchange(e.to_string()))?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| IdentityExchangeError::TokenExchange(e.to_string()))?;
        Ok(token.access_token)
    }

    async fn request_profile(&self, access_token: &str) -> Result<ProfileResponse, IdentityExchangeError> {
        self.http
            .get(&self.config.profile_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityExchangeError::Profile(e.to_string()))?
            .error_for_status()
            .map_err(|e| IdentityExchangeError::Profile(e.to_string()))?
            .json()
            .await
            .map_err(|e| IdentityExchangeError::Profile(e.to_string()))
    }

    fn avatar_url(&self, id: &str, avatar: Option<&str>) -> String {
        match avatar {
            Some(hash) if !id.is_empty() => format!(
                "{}/{}/{}.png",
                self.config.avatar_base_url.trim_end_matches('/'),
                id,
                hash
            ),
            _ => DEFAULT_AVATAR_URL.to_string(),
        }
    }
}

#[async_trait]
impl IdentityExchange for OAuthIdentityExchange {
    async fn exchange(
        &self,
        request: &IdentityRequest,
    ) -> Result<IdentityProfile, IdentityExchangeError> {
        let access_token = self.request_token(request).await?;
        let profile = self.request_profile(&access_token).await?;

        let username = profile
            .username
            .filter(|name| !name.is_empty())
            .ok_or(IdentityExchangeError::MissingUsername)?;
        let id = profile.id.unwrap_or_default();
        let avatar = self.avatar_url(&id, profile.avatar.as_deref());

        Ok(IdentityProfile {
            username,
            id,
            avatar,
        })
    }
}
