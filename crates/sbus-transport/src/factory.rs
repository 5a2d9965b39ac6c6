// crates/sbus-transport/src/factory.rs
// ============================================================================
// Module: Transport Factory
// Description: Builds a ready-to-run transport from a DSN and options.
// Purpose: Wire resolution, endpoints, clients, and authentication together.
// Dependencies: sbus-core, thiserror
// ============================================================================

//! ## Overview
//! The factory is the single assembly point for a production transport: it
//! resolves the DSN into a validated configuration, builds the sender and
//! receiver clients over the blocking HTTP implementation, and wraps them in
//! signing decorators. Callers that need custom HTTP behavior can bypass the
//! factory and assemble a [`Transport`] from the same pieces by hand.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sbus_core::ConnectionConfig;
use sbus_core::DSN_SCHEME;
use sbus_core::EnvelopeSerializer;
use sbus_core::TransportOptions;
use sbus_core::ValidationError;
use sbus_core::resolve;
use thiserror::Error;

use crate::auth::SasClient;
use crate::client::ClientConfig;
use crate::http::HttpClientConfig;
use crate::http::HttpError;
use crate::http::ReqwestClient;
use crate::transport::Transport;

// ============================================================================
// SECTION: Factory Errors
// ============================================================================

/// Failures raised while assembling a transport.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// The DSN or options failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The HTTP client could not be constructed.
    #[error(transparent)]
    Http(#[from] HttpError),
}

// ============================================================================
// SECTION: Factory
// ============================================================================

/// Reports whether the factory recognizes the given DSN.
///
/// Recognition is a scheme-prefix check only; a recognized DSN may still
/// fail validation when the transport is created.
#[must_use]
pub fn supports(dsn: &str) -> bool {
    dsn.strip_prefix(DSN_SCHEME)
        .is_some_and(|rest| rest.starts_with("://"))
}

/// Assembles a transport from a DSN, options, and a serializer.
///
/// Builds one blocking HTTP client shared by role configuration; the sender
/// and receiver each get their own signing decorator bound to their endpoint.
///
/// # Errors
///
/// Returns [`FactoryError::Validation`] when the DSN or options are invalid
/// and [`FactoryError::Http`] when the HTTP client cannot be built.
pub fn from_dsn<S>(
    dsn: &str,
    options: &TransportOptions,
    transport_name: &str,
    serializer: S,
) -> Result<Transport<S, ReqwestClient>, FactoryError>
where
    S: EnvelopeSerializer,
{
    let config = resolve(dsn, options, transport_name)?;
    with_config(&config, serializer)
}

/// Assembles a transport from an already-resolved configuration.
///
/// # Errors
///
/// Returns [`FactoryError::Validation`] when the signing key is unusable and
/// [`FactoryError::Http`] when the HTTP client cannot be built.
pub fn with_config<S>(
    config: &ConnectionConfig,
    serializer: S,
) -> Result<Transport<S, ReqwestClient>, FactoryError>
where
    S: EnvelopeSerializer,
{
    let http_config = HttpClientConfig::default();
    let sender = SasClient::new(ReqwestClient::new(&http_config)?, ClientConfig::sender(config))?;
    let receiver =
        SasClient::new(ReqwestClient::new(&http_config)?, ClientConfig::receiver(config))?;
    Ok(Transport::new(serializer, sender, receiver, config))
}
