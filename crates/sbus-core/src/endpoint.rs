// crates/sbus-core/src/endpoint.rs
// ============================================================================
// Module: Endpoint Builder
// Description: REST endpoint derivation for sender and receiver roles.
// Purpose: Compute the base broker URL for a validated connection configuration.
// Dependencies: sbus-core config
// ============================================================================

//! ## Overview
//! Endpoints are derived deterministically from a [`ConnectionConfig`] at
//! transport construction and never mutated afterwards. Receiver endpoints
//! for topics include the subscription segment; sender endpoints never do.
//! The URL always ends in a trailing slash so request paths can be appended
//! directly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::config::ConnectionConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Domain suffix of the broker REST surface.
pub const ENDPOINT_DOMAIN: &str = "servicebus.windows.net";

// ============================================================================
// SECTION: Endpoint
// ============================================================================

/// Role an endpoint is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    /// Endpoint used to publish messages.
    Sender,
    /// Endpoint used to fetch and delete messages.
    Receiver,
}

/// Base REST URL for one transport role.
///
/// # Invariants
/// - `url` always ends in `/`.
/// - Recomputed only at construction, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Role this endpoint serves.
    role: EndpointRole,
    /// Absolute base URL, ending in `/`.
    url: String,
}

impl Endpoint {
    /// Builds the endpoint for the given role.
    ///
    /// Receiver endpoints include the subscription segment when the
    /// configuration names one; sender endpoints ignore the subscription.
    #[must_use]
    pub fn build(role: EndpointRole, config: &ConnectionConfig) -> Self {
        let url = match (role, config.subscription.as_deref()) {
            (EndpointRole::Receiver, Some(subscription)) => format!(
                "https://{}.{ENDPOINT_DOMAIN}/{}/subscriptions/{subscription}/",
                config.namespace, config.entity_path
            ),
            _ => format!(
                "https://{}.{ENDPOINT_DOMAIN}/{}/",
                config.namespace, config.entity_path
            ),
        };
        Self { role, url }
    }

    /// Wraps an already-formed base URL for the given role.
    ///
    /// A trailing slash is appended when missing so request paths can be
    /// appended directly.
    #[must_use]
    pub fn from_url(role: EndpointRole, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        Self { role, url }
    }

    /// Returns the role this endpoint serves.
    #[must_use]
    pub const fn role(&self) -> EndpointRole {
        self.role
    }

    /// Returns the absolute base URL, ending in `/`.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolves a request target against this endpoint.
    ///
    /// Absolute targets (such as a `Location` header returned by the broker)
    /// pass through unchanged; relative paths are appended to the base URL.
    #[must_use]
    pub fn join(&self, target: &str) -> String {
        if target.starts_with("https://") || target.starts_with("http://") {
            target.to_string()
        } else {
            format!("{}{target}", self.url)
        }
    }
}
