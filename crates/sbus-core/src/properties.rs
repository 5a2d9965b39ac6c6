// crates/sbus-core/src/properties.rs
// ============================================================================
// Module: Broker Properties Codec
// Description: Encoder/decoder for the broker's message-metadata header.
// Purpose: Map the JSON `BrokerProperties` header to a structured record.
// Dependencies: serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! The broker attaches message metadata to receive responses as a JSON object
//! in the `BrokerProperties` header, and accepts the same header on send.
//! [`BrokerProperties::decode`] is total: a missing, empty, or malformed
//! header yields an all-absent record rather than an error. Encoding emits a
//! JSON object containing only the present fields and is always an object,
//! even when every field is absent.
//!
//! Timestamp handling is asymmetric on purpose: decoded timestamps are
//! converted to the process-local offset, while encoding emits the broker's
//! plain `YYYY-MM-DD HH:mm:ss` pattern with no zone designator. The broker
//! deployment this transport targets expects exactly that shape; see
//! `DESIGN.md` before "fixing" it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::UtcOffset;
use time::macros::format_description;

use crate::error::ErrorKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the broker's message-metadata header.
pub const BROKER_PROPERTIES_HEADER: &str = "BrokerProperties";

// ============================================================================
// SECTION: Codec Errors
// ============================================================================

/// Failures raised while encoding the metadata header.
///
/// # Invariants
/// - Decoding never raises; only encoding can fail.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The properties could not be serialized to JSON.
    #[error("could not encode the \"BrokerProperties\" header: {source}")]
    Encode {
        /// Underlying serialization failure.
        #[source]
        source: serde_json::Error,
    },
}

impl CodecError {
    /// Returns the stable discriminant for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Encode { .. } => ErrorKind::EncodeBrokerProperties,
        }
    }
}

// ============================================================================
// SECTION: Broker Properties
// ============================================================================

/// Structured form of the broker's message-metadata header.
///
/// All fields are optional; the broker only sends the subset that applies to
/// a message, and applications only set the subset they need. Wire names are
/// PascalCase with the historical `SessionID` spelling.
///
/// # Invariants
/// - Encoding never emits a key whose value is absent.
/// - Encoding always produces a JSON object, never an array or scalar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BrokerProperties {
    /// Content type of the message body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Application correlation identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Session the message belongs to.
    #[serde(rename = "SessionID", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Number of deliveries attempted for this message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_count: Option<u32>,
    /// Instant the peek-lock expires.
    #[serde(with = "wire_timestamp", skip_serializing_if = "Option::is_none")]
    pub locked_until_utc: Option<OffsetDateTime>,
    /// Lock token required to delete a peek-locked message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_token: Option<String>,
    /// Broker message identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Application label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Reply-to address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    /// Instant the broker enqueued the message.
    #[serde(with = "wire_timestamp", skip_serializing_if = "Option::is_none")]
    pub enqueued_time_utc: Option<OffsetDateTime>,
    /// Broker sequence number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<i64>,
    /// Message time-to-live in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<i64>,
    /// Destination address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Instant a scheduled message becomes visible.
    #[serde(with = "wire_timestamp", skip_serializing_if = "Option::is_none")]
    pub scheduled_enqueue_time_utc: Option<OffsetDateTime>,
    /// Session to reply into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_session_id: Option<String>,
    /// Partition routing key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,
}

impl BrokerProperties {
    /// Decodes the metadata header into a structured record.
    ///
    /// A missing, empty, or malformed header (including JSON that is not an
    /// object, or an object with members of the wrong shape) yields an
    /// all-absent record; decoding never raises. Timestamp strings are
    /// converted to the process-local offset.
    #[must_use]
    pub fn decode(header: Option<&str>) -> Self {
        header
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    /// Encodes the present fields into the JSON header value.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] when serialization fails, for example
    /// when a timestamp falls outside the formattable range.
    pub fn encode(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(|source| CodecError::Encode {
            source,
        })
    }
}

// ============================================================================
// SECTION: Timestamp Wire Format
// ============================================================================

/// Serde adapter for the broker's timestamp fields.
///
/// Decoding accepts the broker's plain pattern (assumed UTC), RFC 3339,
/// RFC 2822, and the HTTP-date form, then converts to the process-local
/// offset. Encoding always emits the plain pattern without a zone designator.
mod wire_timestamp {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;
    use serde::de::Error as DeError;
    use serde::ser::Error as SerError;
    use time::OffsetDateTime;
    use time::PrimitiveDateTime;
    use time::format_description::well_known::Rfc2822;
    use time::format_description::well_known::Rfc3339;

    use super::HTTP_DATE_PATTERN;
    use super::PLAIN_PATTERN;
    use super::local_offset;

    /// Formats a present timestamp with the plain broker pattern.
    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(timestamp) => {
                let text = timestamp.format(&PLAIN_PATTERN).map_err(S::Error::custom)?;
                serializer.serialize_some(&text)
            }
            None => serializer.serialize_none(),
        }
    }

    /// Parses an optional timestamp string, converting to the local offset.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(text) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        parse(&text)
            .map(|timestamp| Some(timestamp.to_offset(local_offset())))
            .ok_or_else(|| D::Error::custom(format!("unrecognized timestamp \"{text}\"")))
    }

    /// Tries the accepted input shapes in order.
    fn parse(text: &str) -> Option<OffsetDateTime> {
        if let Ok(naive) = PrimitiveDateTime::parse(text, &PLAIN_PATTERN) {
            return Some(naive.assume_utc());
        }
        if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
            return Some(timestamp);
        }
        if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc2822) {
            return Some(timestamp);
        }
        if let Ok(naive) = PrimitiveDateTime::parse(text, &HTTP_DATE_PATTERN) {
            return Some(naive.assume_utc());
        }
        None
    }
}

/// Plain broker timestamp pattern, with no zone designator.
static PLAIN_PATTERN: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// HTTP-date pattern used by the broker for UTC timestamps.
static HTTP_DATE_PATTERN: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );

/// Returns the process-local offset, falling back to UTC when it cannot be
/// determined (for example in multi-threaded processes on some platforms).
fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}
