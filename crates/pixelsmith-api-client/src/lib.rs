//! HTTP client for the media service's administrative API.
//!
//! Provides a minimal client with Basic auth (API key and secret), generic GET and
//! form POST helpers, and the domain methods the editor needs: reading a resource's
//! metadata and asking the service to transcribe a video.

pub mod api;

use pixelsmith_core::AdminCredentials;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

/// Admin API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response as JSON: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Result type for admin API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Authentication strategy for the API.
#[derive(Clone)]
pub enum Auth {
    /// HTTP Basic with `api_key:api_secret`
    Basic { api_key: String, api_secret: String },
}

impl Debug for Auth {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Auth::Basic { api_key, .. } => f
                .debug_struct("Basic")
                .field("api_key", api_key)
                .field("api_secret", &"<redacted>")
                .finish(),
        }
    }
}

/// HTTP client for the admin API of one cloud account.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    /// `base_url` is the account root, e.g. `https://api.cloudinary.com/v1_1/demo`.
    pub fn new(base_url: String, auth: Auth) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Client for `{admin_api_url}/{cloud_name}`.
    pub fn from_credentials(admin_api_url: &str, credentials: &AdminCredentials) -> ApiResult<Self> {
        if credentials.cloud_name.trim().is_empty() {
            return Err(ApiError::Config("cloud name must not be empty".to_string()));
        }

        let base_url = format!(
            "{}/{}",
            admin_api_url.trim_end_matches('/'),
            credentials.cloud_name
        );

        Self::new(
            base_url,
            Auth::Basic {
                api_key: credentials.api_key.clone(),
                api_secret: credentials.api_secret.clone(),
            },
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Basic {
                api_key,
                api_secret,
            } => request.basic_auth(api_key, Some(api_secret)),
        }
    }

    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.get(&url));

        let response = request.send().await.map_err(ApiError::Transport)?;
        let response = Self::check_status(response).await?;

        response.json().await.map_err(ApiError::Decode)
    }

    /// POST an urlencoded form body and deserialize the JSON response.
    pub async fn post_form<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &B,
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).form(form));

        let response = request.send().await.map_err(ApiError::Transport)?;
        let response = Self::check_status(response).await?;

        response.json().await.map_err(ApiError::Decode)
    }
}

pub use api::{ResourceDetails, ResourceInfo};
