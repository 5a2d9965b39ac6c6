// crates/sbus-transport/src/lib.rs
// ============================================================================
// Module: Service Bus Transport
// Description: Blocking HTTP transport over the Service Bus REST surface.
// Purpose: Expose the transport engine, signing client, and factory.
// Dependencies: sbus-core, reqwest, thiserror, time
// ============================================================================

//! ## Overview
//! This crate pairs the protocol primitives from `sbus-core` with a blocking
//! HTTP stack: an injectable [`HttpClient`] seam with a production `reqwest`
//! implementation, a signing decorator that stamps a fresh Shared Access
//! Signature on every request, role-specific client configuration, the
//! transport engine itself, and a factory that assembles the whole pipeline
//! from a DSN.
//! Invariants:
//! - Every broker request carries a freshly generated authorization token.
//! - Transport operations are single protocol runs with no internal retries.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod client;
pub mod factory;
pub mod http;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::SasClient;
pub use client::ClientConfig;
pub use client::SENDER_CONTENT_TYPE;
pub use factory::FactoryError;
pub use factory::from_dsn;
pub use factory::supports;
pub use factory::with_config;
pub use http::HttpClient;
pub use http::HttpClientConfig;
pub use http::HttpError;
pub use http::HttpMethod;
pub use http::HttpRequest;
pub use http::HttpResponse;
pub use http::ReqwestClient;
pub use transport::Transport;
pub use transport::TransportError;

#[cfg(test)]
mod tests;
