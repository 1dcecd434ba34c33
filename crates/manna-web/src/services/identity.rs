//! Identity delegation
//!
//! Minimal password-grant client for the Supabase auth endpoint: one call
//! to sign in, one to sign out. Token refresh, persisted sessions, and the
//! rest of the auth protocol stay with the identity provider.

use std::fmt;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use manna_core::store::Identity;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid identity configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Auth API error: {0}")]
    Api(String),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

/// A signed-in operator plus the bearer token the content store should use
#[derive(Clone)]
pub struct SignedInSession {
    pub identity: Identity,
    pub access_token: String,
}

impl fmt::Debug for SignedInSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SignedInSession")
            .field("identity", &self.identity)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Password-grant client for the Supabase auth endpoint
pub struct IdentityService {
    auth_url: String,
    anon_key: String,
    client: Client,
}

impl IdentityService {
    pub fn new(url: impl AsRef<str>, anon_key: impl Into<String>) -> IdentityResult<Self> {
        let auth_url = normalize_auth_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(IdentityError::InvalidConfiguration(
                "Supabase anon key must not be empty",
            ));
        }

        Ok(Self {
            auth_url,
            anon_key,
            client: Client::builder().build()?,
        })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<SignedInSession> {
        validate_credentials(email, password)?;

        let payload = serde_json::json!({
            "email": email,
            "password": password,
        });
        let response = self
            .client
            .post(format!("{}/token", self.auth_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api(parse_api_error(status, &body)));
        }

        let payload = response.json::<TokenResponse>().await?;
        payload.into_session()
    }

    pub async fn sign_out(&self, access_token: &str) -> IdentityResult<()> {
        let response = self
            .client
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        // An already-expired token signs out just the same.
        if !(response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED) {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::Api(parse_api_error(status, &body)));
        }
        Ok(())
    }
}

/// Normalize a Supabase project URL into its auth base.
pub fn normalize_auth_url(url: &str) -> IdentityResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(IdentityError::InvalidConfiguration(
            "Supabase URL must not be empty",
        ));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(IdentityError::InvalidConfiguration(
            "Supabase URL must include http:// or https://",
        ));
    }
    if trimmed.ends_with("/auth/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/auth/v1"))
    }
}

pub(crate) fn validate_credentials(email: &str, password: &str) -> IdentityResult<()> {
    if email.trim().is_empty() {
        return Err(IdentityError::Api("Email is required".to_string()));
    }
    if password.trim().is_empty() {
        return Err(IdentityError::Api("Password is required".to_string()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    user: Option<TokenUser>,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self) -> IdentityResult<SignedInSession> {
        match (self.access_token, self.user) {
            (Some(access_token), Some(user)) => Ok(SignedInSession {
                identity: Identity {
                    id: user.id,
                    email: user.email,
                },
                access_token,
            }),
            _ => Err(IdentityError::Api(
                "Sign-in response did not include an active session".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    msg: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<AuthErrorResponse>(body) {
        if let Some(message) = payload
            .message
            .or(payload.msg)
            .or(payload.error_description)
            .or(payload.error)
        {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}
