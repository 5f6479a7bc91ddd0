//! Backend HTTP client
//!
//! Thin wrapper over [`reqwest::Client`] shared by the catalog, orders and
//! payments services. Every request carries the configured timeout, and every
//! non-2xx response is turned into [`ApiError::Backend`] with the server's
//! message when the body has one.

use bakehouse::money::MoneyConversionError;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::config::ApiConfig;

/// Errors talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection, TLS or protocol failure.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend responded with status {status}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// `message` or `error` from a JSON body, when present
        message: Option<String>,
    },

    /// A 2xx body that is not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A 2xx body without a required field.
    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    /// A price in the response cannot be represented.
    #[error("invalid amount in response: {0}")]
    InvalidAmount(#[from] MoneyConversionError),

    /// The configured base URL cannot be used.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The server-supplied message, if the backend sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Backend {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(error)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Extract `message` (or `error`) from a JSON error body.
pub fn backend_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;

    parsed
        .message
        .or(parsed.error)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}

/// Decode a response body, mapping error statuses to [`ApiError::Backend`].
///
/// # Errors
///
/// Returns [`ApiError::Backend`] for non-2xx statuses and
/// [`ApiError::Decode`] when a 2xx body is not the expected JSON.
pub fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ApiError> {
    if !status.is_success() {
        return Err(ApiError::Backend {
            status: status.as_u16(),
            message: backend_message(body),
        });
    }

    Ok(serde_json::from_slice(body)?)
}

/// HTTP client bound to the storefront backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse, cannot carry a path,
    /// or the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|source| ApiError::InvalidUrl(format!("{}: {source}", config.api_url)))?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.api_url.clone()));
        }

        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { http, base_url })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments against the base URL, percent-encoding each.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the base URL cannot carry a path.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(segments)?;

        debug!(%url, "GET");

        let response = self.http.get(url).query(query).send().await?;

        read(response).await
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(segments)?;

        debug!(%url, "POST");

        let response = self.http.post(url).json(body).send().await?;

        read(response).await
    }
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;

    decode_body(status, &body)
}
