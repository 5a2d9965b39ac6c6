// crates/sbus-core/src/error.rs
// ============================================================================
// Module: Service Bus Error Discriminants
// Description: Stable error kinds shared by the sbus crates.
// Purpose: Give callers a branchable error identity independent of message text.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Every error produced by the sbus crates maps to exactly one [`ErrorKind`].
//! Callers that need to branch on error identity should use the kind rather
//! than matching on message text, which is not part of the stable contract.
//!
//! The numeric codes returned by [`ErrorKind::code`] are preserved from
//! earlier releases, where they were surfaced directly as exception codes;
//! downstream alerting keys on them. Kinds introduced later have no
//! historical code and report [`NO_HISTORICAL_CODE`].

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Code reported by error kinds that have no counterpart in the historical
/// numeric code set.
pub const NO_HISTORICAL_CODE: u32 = 0;

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Stable discriminant for every failure the sbus crates can report.
///
/// # Invariants
/// - Variants are append-only; existing variants and codes never change.
/// - Each variant maps to exactly one numeric code via [`ErrorKind::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The connection DSN could not be parsed or used the wrong scheme.
    InvalidDsn,
    /// The DSN query string contained a key outside the allowed option set.
    UnknownDsnOption,
    /// No `entity_path` was found in the DSN or the explicit options.
    MissingEntityPath,
    /// A credential or namespace field was missing after all lookups.
    MissingCredential,
    /// The `token_expiry` query value was not a digit-only string.
    InvalidTokenExpiry,
    /// The `receive_mode` value was not one of the recognized modes.
    InvalidReceiveMode,
    /// The shared access key was empty and cannot sign requests.
    EmptySigningKey,
    /// The receive request failed at the HTTP level.
    Receive,
    /// The receive request returned a status outside the expected set.
    UnexpectedStatus,
    /// The received message body could not be decoded by the serializer.
    Decoding,
    /// The outgoing message could not be encoded by the serializer.
    Encoding,
    /// The `BrokerProperties` header could not be encoded to JSON.
    EncodeBrokerProperties,
    /// The serializer produced no message body for an outgoing message.
    MissingEncodedBody,
    /// The send request failed at the HTTP level.
    Send,
    /// The delete request failed at the HTTP level.
    Delete,
    /// An envelope without location header or broker properties was deleted.
    MissingDeleteContext,
    /// Broker properties carried neither a message id nor a sequence number.
    MissingMessageIdentifier,
    /// Broker properties carried no lock token.
    MissingLockToken,
}

impl ErrorKind {
    /// Returns the historical numeric code for this kind.
    ///
    /// Kinds without a historical counterpart return [`NO_HISTORICAL_CODE`].
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::InvalidDsn => 1_643_988_474,
            Self::MissingEntityPath => 1_643_989_596,
            Self::InvalidReceiveMode => 1_643_994_036,
            Self::Receive => 1_644_315_123,
            Self::UnexpectedStatus => 1_644_315_645,
            Self::Delete => 1_644_340_210,
            Self::MissingDeleteContext => 1_644_340_687,
            Self::MissingMessageIdentifier => 1_644_340_921,
            Self::MissingLockToken => 1_644_340_926,
            Self::MissingEncodedBody => 1_644_403_794,
            Self::Send => 1_644_415_901,
            Self::EncodeBrokerProperties => 1_644_511_135,
            Self::UnknownDsnOption
            | Self::MissingCredential
            | Self::InvalidTokenExpiry
            | Self::EmptySigningKey
            | Self::Decoding
            | Self::Encoding => NO_HISTORICAL_CODE,
        }
    }
}
