//! PASS backend API client.
//!
//! One request shape covers every endpoint: JSON in, JSON out, bearer token
//! attached when one is available. A non-success status is the only thing
//! classified as an API failure here; what it means (log out, show inline)
//! is up to the caller.

mod error;

pub use error::{ApiError, ErrorBody};

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::token_store::{Credential, TokenStore};

/// Which credential to attach to a request.
#[derive(Debug, Clone, Default)]
pub enum Auth {
    /// The credential in the token store, if any.
    #[default]
    Stored,
    /// This credential, regardless of what is stored.
    Bearer(Credential),
    /// No `Authorization` header.
    Anonymous,
}

/// Per-request options.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// JSON body; omitted from the request when `None`.
    pub body: Option<Value>,
    /// Credential selection.
    pub auth: Auth,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            auth: Auth::Stored,
        }
    }
}

impl RequestOptions {
    /// A `GET` with the stored credential.
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    /// A `POST` with an optional JSON body.
    #[must_use]
    pub fn post(body: Option<Value>) -> Self {
        Self {
            method: Method::POST,
            body,
            ..Self::default()
        }
    }

    /// Override credential selection.
    #[must_use]
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }
}

/// PASS API client.
///
/// Cheap to clone; clones share the HTTP connection pool and token store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url` reading credentials from `store`.
    ///
    /// A trailing slash on `base_url` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_owned(),
                store,
            }),
        })
    }

    /// Create a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::new(&config.api_base, store)
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The token store credentials are read from.
    #[must_use]
    pub fn token_store(&self) -> &dyn TokenStore {
        self.inner.store.as_ref()
    }

    /// Send a request and return the parsed JSON body.
    ///
    /// A body that is not valid JSON is returned as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] for a non-success status,
    /// [`ApiError::Transport`] when the request does not complete, and
    /// [`ApiError::Storage`] when the stored credential cannot be read.
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let url = format!("{}{path}", self.inner.base_url);
        let credential = match options.auth {
            Auth::Stored => self.inner.store.get()?,
            Auth::Bearer(credential) => Some(credential),
            Auth::Anonymous => None,
        };

        let mut request = self.inner.client.request(options.method, &url);
        if let Some(credential) = &credential {
            request = request.bearer_auth(credential.expose());
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let data = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::Object(Map::new()));

        debug!(status = status.as_u16(), "API response");

        if status.is_success() {
            Ok(data)
        } else {
            Err(ApiError::from_status(status.as_u16(), &data))
        }
    }

    /// `GET` a path with the stored credential and decode the body.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::request`], plus [`ApiError::Decode`] on a schema mismatch.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch(path, RequestOptions::get()).await
    }

    /// `POST` to a path with the stored credential and decode the body.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::get`], plus [`ApiError::Decode`] if `body` cannot be
    /// serialized.
    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| decode_error(path, &e))?;
        self.fetch(path, RequestOptions::post(body)).await
    }

    /// Send a request and decode the body into `T`.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::request`], plus [`ApiError::Decode`] on a schema mismatch.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let value = self.request(path, options).await?;
        serde_json::from_value(value).map_err(|e| decode_error(path, &e))
    }
}

fn decode_error(path: &str, err: &serde_json::Error) -> ApiError {
    ApiError::Decode {
        path: path.to_owned(),
        message: err.to_string(),
    }
}
