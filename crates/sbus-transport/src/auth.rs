// crates/sbus-transport/src/auth.rs
// ============================================================================
// Module: Authenticating Request Decorator
// Description: SAS token injection around any HTTP client.
// Purpose: Make every outgoing request carry a fresh Authorization header.
// Dependencies: sbus-core, time
// ============================================================================

//! ## Overview
//! [`SasClient`] wraps an inner [`HttpClient`] and, before delegating,
//! overwrites the `Authorization` header with a freshly generated Shared
//! Access Signature. The signed resource is always the decorator's own
//! declared endpoint: tokens describe the logical entity, not the individual
//! sub-path being called. Relative request targets are resolved against that
//! endpoint; everything else passes through unchanged. The decorator adds no
//! retries, caching, or timeout handling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sbus_core::Endpoint;
use sbus_core::SasTokenGenerator;
use sbus_core::ValidationError;
use time::OffsetDateTime;

use crate::client::ClientConfig;
use crate::http::HttpClient;
use crate::http::HttpError;
use crate::http::HttpRequest;
use crate::http::HttpResponse;

// ============================================================================
// SECTION: Decorator
// ============================================================================

/// HTTP client decorator injecting Shared Access Signature tokens.
///
/// # Invariants
/// - The `Authorization` header is overwritten on every request; tokens are
///   never cached or reused across calls.
pub struct SasClient<C> {
    /// Decorated client.
    inner: C,
    /// Base endpoint relative targets resolve against.
    endpoint: Endpoint,
    /// Token generator bound to the endpoint above.
    generator: SasTokenGenerator,
    /// Role default headers merged into every request.
    default_headers: sbus_core::Headers,
}

impl<C> SasClient<C> {
    /// Wraps `inner` with authentication for the given role configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySigningKey`] when the configuration
    /// carries an empty shared access key.
    pub fn new(inner: C, config: ClientConfig) -> Result<Self, ValidationError> {
        let generator = SasTokenGenerator::new(
            config.endpoint.url(),
            config.shared_access_key_name,
            config.shared_access_key,
            config.token_expiry,
        )?;
        Ok(Self {
            inner,
            endpoint: config.endpoint,
            generator,
            default_headers: config.default_headers,
        })
    }

    /// Returns the endpoint this client is bound to.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl<C: HttpClient> HttpClient for SasClient<C> {
    fn request(&self, mut request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.url = self.endpoint.join(&request.url);
        for (name, value) in &self.default_headers {
            request
                .headers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        request.headers.insert(
            "Authorization".to_string(),
            self.generator.generate(OffsetDateTime::now_utc()),
        );
        self.inner.request(request)
    }
}
