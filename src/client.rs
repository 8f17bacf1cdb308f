//
//  scm-client
//  client.rs
//

//! # HTTP Transport Wrapper
//!
//! This module provides the execution primitive every resource service is
//! built on: the [`Transport`] trait, which performs one authenticated HTTP
//! call and returns the response status, rate-limit metadata, and raw body.
//!
//! ## Features
//!
//! - Bearer and Basic authentication header injection
//! - Provider error-body parsing into clean messages
//! - Rate-limit header extraction (`X-RateLimit-*`)
//! - Custom User-Agent header
//!
//! The default implementation, [`HttpTransport`], is backed by `reqwest`.
//! Services only see the trait, so tests can substitute a fake transport and
//! the facade clients can share one connection pool per provider.
//!
//! ## Cancellation
//!
//! Deadlines and cancellation are the transport's concern: configure the
//! underlying `reqwest` client with timeouts, or wrap calls in your runtime's
//! timeout combinator. Services never block except on the network I/O
//! performed here.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::common::{ApiError, ApiResult, Rate, Response};

/// Library version, sent as part of the User-Agent header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parses a provider API error response and extracts a clean message.
///
/// Providers wrap errors in different envelopes:
///
/// ```json
/// {"message": "Not Found Project"}
/// {"error": {"message": "Repository not found"}}
/// {"errors": [{"message": "..."}]}
/// ```
///
/// This function attempts each format in turn and falls back to the raw body
/// when none match.
pub fn format_api_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            // Simple format: {"message": "..."}
            if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
                return Some(message.to_string());
            }

            // Nested format: {"error": {"message": "..."}}
            if let Some(message) = json
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
            {
                return Some(message.to_string());
            }

            // Array format: {"errors": [{"message": "..."}]}
            json.get("errors")
                .and_then(|e| e.as_array())
                .and_then(|arr| arr.first())
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| body.to_string());

    ApiError::Http {
        status: status.as_u16(),
        message,
    }
}

/// Authentication credentials applied to outgoing requests.
///
/// # Example
///
/// ```rust,no_run
/// use scm_client::client::{Credentials, HttpTransport};
///
/// let transport = HttpTransport::new("https://gitee.com")?
///     .with_credentials(Credentials::bearer("your-token"));
/// # Ok::<(), scm_client::common::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub enum Credentials {
    /// OAuth or personal access token sent as `Authorization: Bearer`.
    Bearer(String),

    /// Username and password (or app password) sent as `Authorization: Basic`.
    Basic {
        /// Account username.
        username: String,
        /// Password or app password.
        password: String,
    },
}

impl Credentials {
    /// Creates bearer-token credentials.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Creates basic-auth credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Raw response descriptor returned by a [`Transport`].
///
/// Carries everything a service needs to build its typed result: the HTTP
/// status, whatever rate-limit metadata the provider exposed, and the
/// undecoded body bytes.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// HTTP status code of the response.
    pub status: u16,

    /// Rate-limit metadata extracted from response headers.
    pub rate: Rate,

    /// Raw response body. Empty for 204-style responses.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Returns the response metadata pair handed back to callers.
    pub fn meta(&self) -> Response {
        Response {
            status: self.status,
            rate: self.rate.clone(),
        }
    }
}

/// The HTTP execution primitive this crate is built on top of.
///
/// One call performs one authenticated request against the provider base URL
/// and returns the normalized [`RawResponse`]. Non-2xx statuses surface as
/// [`ApiError::Http`] so callers can distinguish "not found" from "rate
/// limited" by inspecting the status.
///
/// Implementations must be safe for concurrent reuse; resource services
/// share a single transport handle and hold no other state.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes one HTTP request.
    ///
    /// `path` is relative to the provider base URL and may already contain a
    /// query string. `body`, when present, is sent as a JSON request body.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<RawResponse, ApiError>;
}

/// Default `reqwest`-backed [`Transport`] implementation.
///
/// Handles base-URL joining, authentication header injection, JSON request
/// bodies, and error-body parsing. Connection pooling, proxies, and timeouts
/// are inherited from the underlying `reqwest` client.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use scm_client::client::{Credentials, HttpTransport};
/// use scm_client::gitee::GiteeClient;
///
/// let transport = HttpTransport::new("https://gitee.com")?
///     .with_credentials(Credentials::bearer("your-token"));
/// let client = GiteeClient::with_transport(Arc::new(transport));
/// # Ok::<(), scm_client::common::ApiError>(())
/// ```
pub struct HttpTransport {
    /// The underlying HTTP client.
    http: Client,
    /// Provider base URL without a trailing slash.
    base_url: String,
    /// Optional authentication credentials.
    credentials: Option<Credentials>,
}

impl HttpTransport {
    /// Creates a transport for the given provider base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            http: Client::builder()
                .user_agent(format!("scm-client/{VERSION}"))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials: None,
        })
    }

    /// Sets the authentication credentials, builder style.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Returns the provider base URL this transport targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<RawResponse, ApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);
        match &self.credentials {
            Some(Credentials::Bearer(token)) => {
                request = request.bearer_auth(token);
            }
            Some(Credentials::Basic { username, password }) => {
                request = request.basic_auth(username, Some(password));
            }
            None => {}
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let rate = rate_from_headers(response.headers());
        tracing::debug!("{} returned {}", url, status);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(format_api_error(status, &text));
        }

        Ok(RawResponse {
            status: status.as_u16(),
            rate,
            body: response.bytes().await?.to_vec(),
        })
    }
}

/// Extracts `X-RateLimit-*` metadata from response headers.
fn rate_from_headers(headers: &reqwest::header::HeaderMap) -> Rate {
    let field = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
    };
    Rate {
        limit: field("x-ratelimit-limit"),
        remaining: field("x-ratelimit-remaining"),
        reset: field("x-ratelimit-reset"),
    }
}

/// Executes a request and decodes the JSON body into `T`.
///
/// Shared by every resource service; pairs the decoded entity with the
/// response metadata.
pub(crate) async fn execute_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> ApiResult<T> {
    let raw = transport.execute(method, path, body).await?;
    let meta = raw.meta();
    let data = serde_json::from_slice(&raw.body)?;
    Ok((data, meta))
}

/// Executes a request whose response body is irrelevant (delete-style calls).
pub(crate) async fn execute_empty(
    transport: &dyn Transport,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> Result<Response, ApiError> {
    let raw = transport.execute(method, path, body).await?;
    Ok(raw.meta())
}

/// Call-recording transport used by service unit tests.
///
/// Returns the canned body for every request and records the method and path
/// it was invoked with, so tests can assert on endpoint construction and on
/// the number of network calls made.
#[cfg(test)]
pub(crate) struct FakeTransport {
    pub calls: std::sync::Mutex<Vec<(Method, String)>>,
    pub status: u16,
    pub body: Vec<u8>,
}

#[cfg(test)]
impl FakeTransport {
    pub fn returning(body: &str) -> Self {
        Self {
            calls: std::sync::Mutex::new(Vec::new()),
            status: 200,
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_path(&self) -> String {
        self.calls.lock().unwrap().last().unwrap().1.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Transport for FakeTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        _body: Option<Value>,
    ) -> Result<RawResponse, ApiError> {
        self.calls.lock().unwrap().push((method, path.to_string()));
        Ok(RawResponse {
            status: self.status,
            rate: Rate::default(),
            body: self.body.clone(),
        })
    }
}
