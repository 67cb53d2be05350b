//! The `ServerApi` seam, its HTTP implementation, and CLI error types.

use anyhow::anyhow;
use async_trait::async_trait;
use gpufleet_api_models::{
    DeployRequest, DeployedPayload, Envelope, NoPayload, ServerList, ServerPayload,
};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub(crate) const HEADER_API_KEY: &str = "x-gpufleet-api-key";
pub(crate) const SERVERS_PATH: &str = "servers";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl From<ApiError> for CliError {
    fn from(error: ApiError) -> Self {
        Self::Failure(error.into())
    }
}

/// Transport- and decoding-level errors surfaced by [`ServerApi`]
/// implementations.
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        source: reqwest::Error,
    },
    #[error("{message} (status {status})")]
    Status { status: StatusCode, message: String },
}

/// Abstract client for the remote provisioning API. One method per remote
/// operation; every call returns the `{success, ...}` envelope untouched so
/// callers decide how to treat logical failures.
#[async_trait]
pub(crate) trait ServerApi {
    async fn list_servers(&self) -> Result<Envelope<ServerList>, ApiError>;
    async fn get_server(&self, id: &str) -> Result<Envelope<ServerPayload>, ApiError>;
    async fn start_server(&self, id: &str) -> Result<Envelope<NoPayload>, ApiError>;
    async fn stop_server(&self, id: &str) -> Result<Envelope<NoPayload>, ApiError>;
    async fn delete_server(&self, id: &str) -> Result<Envelope<NoPayload>, ApiError>;
    async fn deploy_server(
        &self,
        request: &DeployRequest,
    ) -> Result<Envelope<DeployedPayload>, ApiError>;
}

/// `reqwest`-backed implementation of [`ServerApi`].
pub(crate) struct HttpServerApi {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpServerApi {
    pub(crate) const fn new(client: Client, base_url: Url, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Resolve an endpoint path relative to the base URL, keeping any path
    /// prefix the base carries (e.g. a reverse proxy mount point).
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let normalized = format!("{}/", base.path());
            base.set_path(&normalized);
        }
        Ok(base.join(path)?)
    }

    async fn execute<T>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let mut builder = builder;
        if let Some(key) = &self.api_key {
            builder = builder.header(HEADER_API_KEY, key);
        }
        tracing::debug!(endpoint, "issuing API request");
        let response = builder.send().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if !response.status().is_success() {
            return Err(read_failure(response).await);
        }
        response
            .json::<Envelope<T>>()
            .await
            .map_err(|source| ApiError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

#[async_trait]
impl ServerApi for HttpServerApi {
    async fn list_servers(&self) -> Result<Envelope<ServerList>, ApiError> {
        let url = self.url(SERVERS_PATH)?;
        self.execute(self.client.get(url), SERVERS_PATH).await
    }

    async fn get_server(&self, id: &str) -> Result<Envelope<ServerPayload>, ApiError> {
        let endpoint = format!("{SERVERS_PATH}/{id}");
        let url = self.url(&endpoint)?;
        self.execute(self.client.get(url), &endpoint).await
    }

    async fn start_server(&self, id: &str) -> Result<Envelope<NoPayload>, ApiError> {
        let endpoint = format!("{SERVERS_PATH}/{id}/start");
        let url = self.url(&endpoint)?;
        self.execute(self.client.post(url), &endpoint).await
    }

    async fn stop_server(&self, id: &str) -> Result<Envelope<NoPayload>, ApiError> {
        let endpoint = format!("{SERVERS_PATH}/{id}/stop");
        let url = self.url(&endpoint)?;
        self.execute(self.client.post(url), &endpoint).await
    }

    async fn delete_server(&self, id: &str) -> Result<Envelope<NoPayload>, ApiError> {
        let endpoint = format!("{SERVERS_PATH}/{id}");
        let url = self.url(&endpoint)?;
        self.execute(self.client.delete(url), &endpoint).await
    }

    async fn deploy_server(
        &self,
        request: &DeployRequest,
    ) -> Result<Envelope<DeployedPayload>, ApiError> {
        let endpoint = format!("{SERVERS_PATH}/deploy");
        let url = self.url(&endpoint)?;
        self.execute(self.client.post(url).json(request), &endpoint)
            .await
    }
}

/// Unwrap an envelope, converting `success: false` into the generic endpoint
/// failure. Applied uniformly to every command; the exit-code contract says
/// `success=false` is always an error.
pub(crate) fn ensure_success<T>(envelope: Envelope<T>) -> CliResult<T> {
    if envelope.success {
        Ok(envelope.payload)
    } else {
        Err(CliError::failure(anyhow!("endpoint returned error")))
    }
}

/// Trim the API key flag/env value, rejecting values that are all whitespace.
pub(crate) fn parse_api_key(input: Option<String>) -> CliResult<Option<String>> {
    let Some(raw) = input else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation("API key cannot be an empty string"));
    }
    Ok(Some(trimmed.to_string()))
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Classify a non-2xx HTTP response, preferring the API's own error message
/// when the body carries one.
async fn read_failure(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();

    let body_text = String::from_utf8_lossy(&bytes).trim().to_string();
    let message = serde_json::from_slice::<ErrorBody>(&bytes)
        .ok()
        .and_then(|body| body.error)
        .unwrap_or(body_text);
    let message = if message.is_empty() {
        "request failed".to_string()
    } else {
        message
    };

    ApiError::Status { status, message }
}
