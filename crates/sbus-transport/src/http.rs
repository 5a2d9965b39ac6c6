// crates/sbus-transport/src/http.rs
// ============================================================================
// Module: HTTP Client Seam
// Description: Minimal blocking HTTP capability consumed by the transport.
// Purpose: Decouple the protocol engine from the concrete HTTP library.
// Dependencies: reqwest, thiserror, sbus-core
// ============================================================================

//! ## Overview
//! The transport engine only needs "send a request, get status, headers, and
//! body back". [`HttpClient`] captures exactly that; [`ReqwestClient`] is the
//! production implementation on the blocking `reqwest` client with redirects
//! disabled. Retries, pooling, and timeouts are properties of the underlying
//! client, not of this seam.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use sbus_core::Headers;
use thiserror::Error;

// ============================================================================
// SECTION: Request and Response
// ============================================================================

/// HTTP verbs used by the broker protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Publish or peek-lock receive.
    Post,
    /// Destructive receive or message deletion.
    Delete,
}

impl HttpMethod {
    /// Returns the verb name on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// One outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Verb to use.
    pub method: HttpMethod,
    /// Absolute URL, or a path relative to a decorating client's endpoint.
    pub url: String,
    /// Request headers.
    pub headers: Headers,
    /// Optional request body.
    pub body: Option<String>,
}

/// One received response.
///
/// # Invariants
/// - Header names are stored lowercased; lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Response status code.
    pub status: u16,
    /// Response headers with lowercased names.
    pub headers: Headers,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Looks up a response header by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Transport-level HTTP failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The HTTP client could not be built.
    #[error("http client build failed: {message}")]
    Build {
        /// Underlying failure description.
        message: String,
    },
    /// The request could not be sent.
    #[error("http request failed: {message}")]
    Request {
        /// Underlying failure description.
        message: String,
    },
    /// The response body could not be read.
    #[error("http response could not be read: {message}")]
    Read {
        /// Underlying failure description.
        message: String,
    },
}

// ============================================================================
// SECTION: Client Trait
// ============================================================================

/// Blocking "request in, response out" capability.
///
/// Implementations add no retry, caching, or redirect behavior; a failed
/// call fails immediately and visibly.
pub trait HttpClient {
    /// Performs one blocking HTTP round trip.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the request cannot be sent or the response
    /// cannot be read.
    fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// ============================================================================
// SECTION: Reqwest Implementation
// ============================================================================

/// Configuration for the production HTTP client.
///
/// # Invariants
/// - Redirects are never followed; delete `Location` targets are handled by
///   the transport engine, not the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            user_agent: "sbus-transport/0.1".to_string(),
        }
    }
}

/// Production [`HttpClient`] backed by the blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    /// Underlying blocking client.
    client: Client,
}

impl ReqwestClient {
    /// Builds a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Build`] when the underlying client cannot be
    /// constructed.
    pub fn new(config: &HttpClientConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| HttpError::Build {
                message: err.to_string(),
            })?;
        Ok(Self {
            client,
        })
    }
}

impl HttpClient for ReqwestClient {
    fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = match request.method {
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().map_err(|err| HttpError::Request {
            message: err.to_string(),
        })?;

        let status = response.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            if let Ok(text) = value.to_str() {
                headers.insert(name.as_str().to_ascii_lowercase(), text.to_string());
            }
        }
        let body = response.text().map_err(|err| HttpError::Read {
            message: err.to_string(),
        })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
