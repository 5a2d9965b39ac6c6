// crates/sbus-core/src/envelope.rs
// ============================================================================
// Module: Envelope and Stamps
// Description: Message envelope with transport metadata stamps.
// Purpose: Carry protocol context between receive and ack/reject/send calls.
// Dependencies: thiserror, sbus-core properties
// ============================================================================

//! ## Overview
//! An [`Envelope`] wraps one application message together with the typed
//! stamps the transport attaches: the raw received body, the routing context
//! needed to build a later delete request, the decoded broker properties,
//! and the transport-level message id. The application serializer is an
//! external collaborator consumed through the [`EnvelopeSerializer`] contract;
//! this crate never inspects message payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::properties::BrokerProperties;

// ============================================================================
// SECTION: Header Map
// ============================================================================

/// Header name/value map exchanged with the serializer and the HTTP layer.
pub type Headers = BTreeMap<String, String>;

// ============================================================================
// SECTION: Stamps
// ============================================================================

/// Marker noting that a message came from the receiver endpoint.
///
/// Carries the exact received bytes plus the optional `Location` header.
/// Never sent back to the broker; it only distinguishes received envelopes
/// from application-constructed ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedStamp {
    /// Raw response body as received.
    raw_body: String,
    /// Optional `Location` response header.
    location: Option<String>,
}

impl ReceivedStamp {
    /// Creates a received marker from the response body and location header.
    #[must_use]
    pub const fn new(raw_body: String, location: Option<String>) -> Self {
        Self {
            raw_body,
            location,
        }
    }

    /// Returns the raw received body.
    #[must_use]
    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    /// Returns the `Location` header when the broker sent one.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Routing context stamped on sent and received messages.
///
/// Captures the exact bytes and routing coordinates of a message so a later
/// ack/reject can build its deletion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStamp {
    /// Queue or topic the message moved through.
    entity_path: String,
    /// Raw message body as sent or received.
    raw_body: String,
    /// Subscription name for topic receivers.
    subscription: Option<String>,
    /// Optional `Location` response header (receive only).
    location: Option<String>,
}

impl MessageStamp {
    /// Creates a message stamp from routing context and the raw body.
    #[must_use]
    pub const fn new(
        entity_path: String,
        raw_body: String,
        subscription: Option<String>,
        location: Option<String>,
    ) -> Self {
        Self {
            entity_path,
            raw_body,
            subscription,
            location,
        }
    }

    /// Returns the queue or topic name.
    #[must_use]
    pub fn entity_path(&self) -> &str {
        &self.entity_path
    }

    /// Returns the raw message body.
    #[must_use]
    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    /// Returns the subscription name when the transport receives a topic.
    #[must_use]
    pub fn subscription(&self) -> Option<&str> {
        self.subscription.as_deref()
    }

    /// Returns the `Location` header when the broker sent one.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

// ============================================================================
// SECTION: Envelope
// ============================================================================

/// Placeholder message wrapped in envelopes built for decoding failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyMessage;

/// Application message plus the transport stamps attached to it.
///
/// # Invariants
/// - Stamps are attached at receive/send time and read at ack/reject time;
///   the transport never mutates an envelope it did not return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<M> {
    /// Application message payload.
    message: M,
    /// Received marker, present only on envelopes returned by `get`.
    received: Option<ReceivedStamp>,
    /// Routing context stamped on sent and received envelopes.
    message_stamp: Option<MessageStamp>,
    /// Decoded or application-provided broker properties.
    broker_properties: Option<BrokerProperties>,
    /// Transport-level message id, mirrored from the broker properties.
    transport_message_id: Option<String>,
}

impl<M> Envelope<M> {
    /// Wraps a message with no stamps attached.
    #[must_use]
    pub const fn new(message: M) -> Self {
        Self {
            message,
            received: None,
            message_stamp: None,
            broker_properties: None,
            transport_message_id: None,
        }
    }

    /// Returns the application message.
    #[must_use]
    pub const fn message(&self) -> &M {
        &self.message
    }

    /// Consumes the envelope and returns the application message.
    #[must_use]
    pub fn into_message(self) -> M {
        self.message
    }

    /// Attaches a received marker.
    #[must_use]
    pub fn with_received(mut self, stamp: ReceivedStamp) -> Self {
        self.received = Some(stamp);
        self
    }

    /// Attaches a routing-context stamp, replacing any previous one.
    #[must_use]
    pub fn with_message_stamp(mut self, stamp: MessageStamp) -> Self {
        self.message_stamp = Some(stamp);
        self
    }

    /// Attaches broker properties.
    #[must_use]
    pub fn with_broker_properties(mut self, properties: BrokerProperties) -> Self {
        self.broker_properties = Some(properties);
        self
    }

    /// Attaches the transport-level message id.
    #[must_use]
    pub fn with_transport_message_id(mut self, id: String) -> Self {
        self.transport_message_id = Some(id);
        self
    }

    /// Returns the received marker when present.
    #[must_use]
    pub const fn received(&self) -> Option<&ReceivedStamp> {
        self.received.as_ref()
    }

    /// Returns the routing-context stamp when present.
    #[must_use]
    pub const fn message_stamp(&self) -> Option<&MessageStamp> {
        self.message_stamp.as_ref()
    }

    /// Returns the broker properties when present.
    #[must_use]
    pub const fn broker_properties(&self) -> Option<&BrokerProperties> {
        self.broker_properties.as_ref()
    }

    /// Returns the transport-level message id when present.
    #[must_use]
    pub fn transport_message_id(&self) -> Option<&str> {
        self.transport_message_id.as_deref()
    }
}

// ============================================================================
// SECTION: Serializer Contract
// ============================================================================

/// Wire form produced by the serializer for an outgoing message.
///
/// # Invariants
/// - A `None` body is a contract violation the transport reports as a fatal
///   error; it is represented here so the violation surfaces at the protocol
///   boundary instead of deep inside a serializer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedMessage {
    /// Message body to send.
    pub body: Option<String>,
    /// Extra headers the serializer wants on the request.
    pub headers: Headers,
}

/// Failure reported by an external serializer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("serializer failure: {message}")]
pub struct SerializerError {
    /// Human-readable failure description.
    pub message: String,
}

impl SerializerError {
    /// Creates a serializer error from any displayable cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// External contract turning application messages into wire bodies and back.
///
/// Implementations are supplied by the surrounding framework; the transport
/// treats them as opaque.
pub trait EnvelopeSerializer {
    /// Application message type produced and consumed by this serializer.
    type Message;

    /// Decodes a received body and headers into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`SerializerError`] when the body cannot be interpreted as an
    /// application message.
    fn decode(&self, body: &str, headers: &Headers)
    -> Result<Envelope<Self::Message>, SerializerError>;

    /// Encodes an envelope into a wire body and headers.
    ///
    /// # Errors
    ///
    /// Returns [`SerializerError`] when the message cannot be serialized.
    fn encode(&self, envelope: &Envelope<Self::Message>)
    -> Result<EncodedMessage, SerializerError>;
}
