// crates/sbus-core/src/lib.rs
// ============================================================================
// Module: Service Bus Core
// Description: Protocol-engine primitives for the Service Bus REST transport.
// Purpose: Provide configuration, endpoints, tokens, and the metadata codec.
// Dependencies: serde, serde_json, thiserror, time, url, hmac, sha2, base64
// ============================================================================

//! ## Overview
//! This crate holds the HTTP-independent half of the Service Bus REST
//! transport: DSN resolution into a validated [`ConnectionConfig`], endpoint
//! derivation, Shared Access Signature token generation, the
//! `BrokerProperties` metadata codec, and the envelope/stamp data model the
//! transport engine exchanges with the application serializer.
//! Invariants:
//! - Configuration is validated once at construction and immutable afterwards.
//! - All errors map to a stable [`ErrorKind`] discriminant.
//!
//! Security posture: DSNs embed credentials; the shared access key is
//! redacted from debug output and never logged by this crate.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod properties;
pub mod sas;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConnectionConfig;
pub use config::DEFAULT_TOKEN_EXPIRY;
pub use config::DSN_SCHEME;
pub use config::ReceiveMode;
pub use config::TransportOptions;
pub use config::ValidationError;
pub use config::resolve;
pub use endpoint::ENDPOINT_DOMAIN;
pub use endpoint::Endpoint;
pub use endpoint::EndpointRole;
pub use envelope::EmptyMessage;
pub use envelope::EncodedMessage;
pub use envelope::Envelope;
pub use envelope::EnvelopeSerializer;
pub use envelope::Headers;
pub use envelope::MessageStamp;
pub use envelope::ReceivedStamp;
pub use envelope::SerializerError;
pub use error::ErrorKind;
pub use error::NO_HISTORICAL_CODE;
pub use properties::BROKER_PROPERTIES_HEADER;
pub use properties::BrokerProperties;
pub use properties::CodecError;
pub use sas::SasTokenGenerator;

#[cfg(test)]
mod tests;
