// HTTP client for the auth endpoints, used by the session manager for
// backend pairing.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiClientError {
    #[error("user not found")]
    NotFound,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server rejected request: {status} {message}")]
    Rejected { status: u16, message: String },
}

/// User record as returned by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUser {
    pub id: i32,
    pub username: String,
    pub npub: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        ApiClient {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// POST /api/auth/login
    pub async fn login(&self, npub: &str) -> Result<RemoteUser, ApiClientError> {
        let response = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&json!({ "npub": npub }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(ApiClientError::NotFound),
            status => Err(Self::rejected(status, response).await),
        }
    }

    /// POST /api/auth/register
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        npub: &str,
    ) -> Result<RemoteUser, ApiClientError> {
        let response = self
            .http
            .post(format!("{}/api/auth/register", self.base_url))
            .json(&json!({
                "username": username,
                "password": password,
                "npub": npub,
            }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::rejected(status, response).await)
        }
    }

    async fn rejected(status: StatusCode, response: reqwest::Response) -> ApiClientError {
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_default();
        ApiClientError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}
