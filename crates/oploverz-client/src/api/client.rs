//! Oploverz API client.
//!
//! Four read-only endpoints, each wrapped in the same envelope. Requests are
//! sent once: no retry, no cache, and no timeout beyond the transport default
//! unless one is configured.

use super::types::*;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://nexta-api.vercel.app/api/anime/oploverz";

/// Gateway failure
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{base_url}': {source}")]
    InvalidBaseUrl {
        base_url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {url} carried no result")]
    MissingResult { url: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The four upstream queries
///
/// Screens are generic over this so they can run against a fake in tests.
pub trait AnimeGateway {
    fn get_home(&self) -> impl Future<Output = ApiResult<HomeResult>> + Send;

    /// `path` is a relative series path such as `/series/spy-x-family-s3`
    fn get_detail(&self, path: &str) -> impl Future<Output = ApiResult<AnimeDetail>> + Send;

    /// `path` is a relative episode path
    fn get_stream(&self, path: &str) -> impl Future<Output = ApiResult<StreamResult>> + Send;

    /// An absent result is an empty list, not an error
    fn search(&self, query: &str)
        -> impl Future<Output = ApiResult<Vec<SearchResultItem>>> + Send;
}

/// Endpoint and its query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Home,
    Detail { path: &'a str },
    Stream { path: &'a str },
    Search { query: &'a str },
}

impl Endpoint<'_> {
    fn segment(&self) -> &'static str {
        match self {
            Endpoint::Home => "home",
            Endpoint::Detail { .. } => "detail",
            Endpoint::Stream { .. } => "stream",
            Endpoint::Search { .. } => "search",
        }
    }

    /// Full request URL under `base`
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(self.segment());
        }

        match self {
            Endpoint::Home => {}
            Endpoint::Detail { path } | Endpoint::Stream { path } => {
                url.query_pairs_mut().append_pair("url", path);
            }
            Endpoint::Search { query } => {
                url.query_pairs_mut().append_pair("q", query);
            }
        }

        url
    }
}

/// HTTP implementation of [`AnimeGateway`]
#[derive(Debug, Clone)]
pub struct OploverzClient {
    /// HTTP client
    client: Client,
    /// Base URL every endpoint is appended to
    base_url: Url,
}

impl OploverzClient {
    /// Create a new client
    pub fn new(base_url: &str, user_agent: &str, timeout: Option<Duration>) -> ApiResult<Self> {
        let base_url = Url::parse(base_url).map_err(|source| ApiError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            source,
        })?;

        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ApiError::Client)?;

        Ok(Self { client, base_url })
    }

    /// Client built from the `[api]` section of the configuration
    pub fn from_config(config: &shared::Config) -> ApiResult<Self> {
        Self::new(&config.api.base_url, &config.api.user_agent, config.api_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request and decode the envelope
    async fn get<T: DeserializeOwned>(&self, url: &Url) -> ApiResult<ApiEnvelope<T>> {
        debug!(url = %url, "Making API request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| {
                warn!(url = %url, error = %source, "Request error");
                ApiError::Transport {
                    url: url.to_string(),
                    source,
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        decode_response(url, status, &body)
    }

    async fn get_result<T: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> ApiResult<T> {
        let url = endpoint.url(&self.base_url);
        let envelope = self.get::<T>(&url).await?;
        unwrap_result(envelope, &url)
    }
}

/// Decode a response body into its envelope
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<ApiEnvelope<T>, serde_json::Error> {
    serde_json::from_str(body)
}

/// Turn a status and body into an envelope; any non-2xx status is a failure
pub fn decode_response<T: DeserializeOwned>(
    url: &Url,
    status: StatusCode,
    body: &str,
) -> ApiResult<ApiEnvelope<T>> {
    if !status.is_success() {
        warn!(url = %url, status = %status, "Request failed");
        return Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let envelope = parse_envelope(body).map_err(|source| {
        warn!(url = %url, error = %source, "Failed to parse response");
        ApiError::Decode {
            url: url.to_string(),
            source,
        }
    })?;

    debug!(url = %url, success = envelope.success, "Request successful");
    Ok(envelope)
}

/// The envelope's result, or [`ApiError::MissingResult`] when absent
pub fn unwrap_result<T>(envelope: ApiEnvelope<T>, url: &Url) -> ApiResult<T> {
    envelope.result.ok_or_else(|| ApiError::MissingResult {
        url: url.to_string(),
    })
}

/// Search results; an absent or null result means no matches
pub fn unwrap_search(envelope: ApiEnvelope<Vec<SearchResultItem>>) -> Vec<SearchResultItem> {
    envelope.result.unwrap_or_default()
}

impl AnimeGateway for OploverzClient {
    async fn get_home(&self) -> ApiResult<HomeResult> {
        info!("Fetching home feed");
        self.get_result(Endpoint::Home).await
    }

    async fn get_detail(&self, path: &str) -> ApiResult<AnimeDetail> {
        info!(path = path, "Fetching anime detail");
        self.get_result(Endpoint::Detail { path }).await
    }

    async fn get_stream(&self, path: &str) -> ApiResult<StreamResult> {
        info!(path = path, "Fetching stream info");
        self.get_result(Endpoint::Stream { path }).await
    }

    async fn search(&self, query: &str) -> ApiResult<Vec<SearchResultItem>> {
        info!(query = query, "Searching");
        let url = Endpoint::Search { query }.url(&self.base_url);
        let envelope = self.get::<Vec<SearchResultItem>>(&url).await?;
        Ok(unwrap_search(envelope))
    }
}
