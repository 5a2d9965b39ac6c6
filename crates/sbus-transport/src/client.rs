// crates/sbus-transport/src/client.rs
// ============================================================================
// Module: Client Configuration Builder
// Description: Per-role client configuration for sender and receiver.
// Purpose: Pair an endpoint with key material and role default headers.
// Dependencies: sbus-core
// ============================================================================

//! ## Overview
//! Each transport owns two authenticated clients, one per role. The sender
//! role carries a fixed outgoing `Content-Type` default header; this is a
//! property of the role, not of the URL, so it lives here next to the key
//! material rather than in the endpoint builder.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sbus_core::ConnectionConfig;
use sbus_core::Endpoint;
use sbus_core::EndpointRole;
use sbus_core::Headers;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed `Content-Type` sent with every publish request.
pub const SENDER_CONTENT_TYPE: &str = "application/atom+xml;type=entry;charset=utf-8";

// ============================================================================
// SECTION: Client Configuration
// ============================================================================

/// Everything an authenticated client needs for one role.
///
/// # Invariants
/// - Derived deterministically from a [`ConnectionConfig`] at construction.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base endpoint for this role.
    pub endpoint: Endpoint,
    /// Shared access key name used for token generation.
    pub shared_access_key_name: String,
    /// Shared access key used for token generation.
    pub shared_access_key: String,
    /// Token validity in seconds.
    pub token_expiry: u32,
    /// Default headers merged into every request for this role.
    pub default_headers: Headers,
}

impl ClientConfig {
    /// Builds the sender-role configuration.
    #[must_use]
    pub fn sender(config: &ConnectionConfig) -> Self {
        let mut default_headers = Headers::new();
        default_headers.insert("Content-Type".to_string(), SENDER_CONTENT_TYPE.to_string());
        Self::build(EndpointRole::Sender, config, default_headers)
    }

    /// Builds the receiver-role configuration.
    #[must_use]
    pub fn receiver(config: &ConnectionConfig) -> Self {
        Self::build(EndpointRole::Receiver, config, Headers::new())
    }

    /// Shared construction for both roles.
    fn build(role: EndpointRole, config: &ConnectionConfig, default_headers: Headers) -> Self {
        Self {
            endpoint: Endpoint::build(role, config),
            shared_access_key_name: config.shared_access_key_name.clone(),
            shared_access_key: config.shared_access_key.clone(),
            token_expiry: config.token_expiry,
            default_headers,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The shared access key is a secret and must never reach logs.
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("shared_access_key_name", &self.shared_access_key_name)
            .field("shared_access_key", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .field("default_headers", &self.default_headers)
            .finish()
    }
}
