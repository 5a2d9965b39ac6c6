// crates/sbus-transport/src/transport.rs
// ============================================================================
// Module: Transport Engine
// Description: get/ack/reject/send protocol runs against the broker REST API.
// Purpose: Orchestrate receive, deletion, and publish flows with stamps.
// Dependencies: sbus-core, thiserror
// ============================================================================

//! ## Overview
//! The transport is stateless between calls: each public operation is one
//! self-contained protocol run against the sender or receiver endpoint,
//! blocking until the HTTP round trip completes. Nothing is retried here;
//! every failure surfaces immediately with enough context for the caller to
//! log and decide. The only swallowed condition is HTTP 204 on receive,
//! which is a legitimate empty result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sbus_core::BROKER_PROPERTIES_HEADER;
use sbus_core::BrokerProperties;
use sbus_core::CodecError;
use sbus_core::ConnectionConfig;
use sbus_core::EmptyMessage;
use sbus_core::Envelope;
use sbus_core::EnvelopeSerializer;
use sbus_core::ErrorKind;
use sbus_core::Headers;
use sbus_core::MessageStamp;
use sbus_core::ReceiveMode;
use sbus_core::ReceivedStamp;
use sbus_core::SerializerError;
use thiserror::Error;

use crate::auth::SasClient;
use crate::http::HttpClient;
use crate::http::HttpError;
use crate::http::HttpMethod;
use crate::http::HttpRequest;

// ============================================================================
// SECTION: Transport Errors
// ============================================================================

/// Failures raised by the transport operations.
///
/// # Invariants
/// - Each variant maps to one [`ErrorKind`] via [`TransportError::kind`];
///   callers branch on the kind, not on message text.
/// - Nothing here is retried internally.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The receive request failed at the HTTP level.
    #[error("could not get message from the service bus: {source}")]
    Receive {
        /// Underlying HTTP failure.
        #[source]
        source: HttpError,
    },
    /// The receive request returned a status outside the expected set.
    #[error("unexpected status code \"{status}\" from the service bus")]
    UnexpectedStatus {
        /// The offending status code.
        status: u16,
    },
    /// The received body could not be decoded into an application message.
    ///
    /// Carries a best-effort envelope around an empty placeholder message
    /// with the same stamps a successful receive would have attached, so
    /// the failure can be logged with full routing context.
    #[error("could not decode received message: {source}")]
    Decoding {
        /// Placeholder envelope with full receive stamps.
        envelope: Box<Envelope<EmptyMessage>>,
        /// Underlying serializer failure.
        #[source]
        source: SerializerError,
    },
    /// The outgoing message could not be encoded by the serializer.
    #[error("could not encode message: {source}")]
    Encoding {
        /// Underlying serializer failure.
        #[source]
        source: SerializerError,
    },
    /// The `BrokerProperties` stamp could not be encoded into its header.
    #[error(transparent)]
    EncodeProperties(#[from] CodecError),
    /// The serializer produced no message body.
    #[error("missing encoded message body")]
    MissingEncodedBody,
    /// The send request failed at the HTTP level.
    #[error("could not send message to the service bus: {source}")]
    Send {
        /// Underlying HTTP failure.
        #[source]
        source: HttpError,
    },
    /// The delete request failed at the HTTP level.
    #[error("could not delete message from the service bus: {source}")]
    Delete {
        /// Underlying HTTP failure.
        #[source]
        source: HttpError,
    },
    /// Ack/reject was called on an envelope without deletion context.
    #[error("cannot delete message: no location header or broker properties on the envelope")]
    MissingDeleteContext,
    /// Broker properties carried neither a message id nor a sequence number.
    #[error("cannot delete message: missing \"MessageId\" or \"SequenceNumber\" in the broker properties")]
    MissingMessageIdentifier,
    /// Broker properties carried no lock token.
    #[error("cannot delete message: missing \"LockToken\" in the broker properties")]
    MissingLockToken,
}

impl TransportError {
    /// Returns the stable discriminant for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Receive { .. } => ErrorKind::Receive,
            Self::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            Self::Decoding { .. } => ErrorKind::Decoding,
            Self::Encoding { .. } => ErrorKind::Encoding,
            Self::EncodeProperties(source) => source.kind(),
            Self::MissingEncodedBody => ErrorKind::MissingEncodedBody,
            Self::Send { .. } => ErrorKind::Send,
            Self::Delete { .. } => ErrorKind::Delete,
            Self::MissingDeleteContext => ErrorKind::MissingDeleteContext,
            Self::MissingMessageIdentifier => ErrorKind::MissingMessageIdentifier,
            Self::MissingLockToken => ErrorKind::MissingLockToken,
        }
    }
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Message-queue transport over the broker REST surface.
///
/// # Invariants
/// - Stateless between calls; safe to share across threads when the
///   serializer and HTTP client are.
/// - Owns its [`ConnectionConfig`]-derived routing context exclusively.
pub struct Transport<S, C> {
    /// External serializer turning messages into wire bodies and back.
    serializer: S,
    /// Authenticated client bound to the sender endpoint.
    sender: SasClient<C>,
    /// Authenticated client bound to the receiver endpoint.
    receiver: SasClient<C>,
    /// Message consumption mode.
    receive_mode: ReceiveMode,
    /// Queue or topic name stamped on envelopes.
    entity_path: String,
    /// Subscription name stamped on envelopes.
    subscription: Option<String>,
}

impl<S, C> Transport<S, C>
where
    S: EnvelopeSerializer,
    C: HttpClient,
{
    /// Creates a transport from its collaborators and routing context.
    ///
    /// This is the single canonical constructor; the sender and receiver
    /// clients must be bound to endpoints derived from the same `config`.
    #[must_use]
    pub fn new(
        serializer: S,
        sender: SasClient<C>,
        receiver: SasClient<C>,
        config: &ConnectionConfig,
    ) -> Self {
        Self {
            serializer,
            sender,
            receiver,
            receive_mode: config.receive_mode,
            entity_path: config.entity_path.clone(),
            subscription: config.subscription.clone(),
        }
    }

    /// Fetches at most one message from the receiver endpoint.
    ///
    /// Peek-lock mode issues `POST messages/head` and expects 201;
    /// receive-and-delete issues `DELETE messages/head` and expects 200.
    /// A 204 response is the legitimate empty result.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Receive`] on HTTP failure,
    /// [`TransportError::UnexpectedStatus`] on any other status, and
    /// [`TransportError::Decoding`] when the serializer rejects the body;
    /// the decoding error carries a placeholder envelope with full stamps.
    pub fn get(&self) -> Result<Option<Envelope<S::Message>>, TransportError> {
        let (method, expected_status) = match self.receive_mode {
            ReceiveMode::PeekLock => (HttpMethod::Post, 201),
            ReceiveMode::ReceiveAndDelete => (HttpMethod::Delete, 200),
        };

        let response = self
            .receiver
            .request(HttpRequest {
                method,
                url: "messages/head".to_string(),
                headers: Headers::new(),
                body: None,
            })
            .map_err(|source| TransportError::Receive {
                source,
            })?;

        if response.status == 204 {
            return Ok(None);
        }
        if response.status != expected_status {
            return Err(TransportError::UnexpectedStatus {
                status: response.status,
            });
        }

        let properties = BrokerProperties::decode(response.header(BROKER_PROPERTIES_HEADER));
        let location = response.header("Location").map(str::to_string);
        let received = ReceivedStamp::new(response.body.clone(), location.clone());
        let message_stamp = MessageStamp::new(
            self.entity_path.clone(),
            response.body.clone(),
            self.subscription.clone(),
            location,
        );
        let message_id = properties.message_id.clone();

        match self.serializer.decode(&response.body, &response.headers) {
            Ok(envelope) => {
                let mut envelope = envelope
                    .with_received(received)
                    .with_message_stamp(message_stamp)
                    .with_broker_properties(properties);
                if let Some(id) = message_id {
                    envelope = envelope.with_transport_message_id(id);
                }
                Ok(Some(envelope))
            }
            Err(source) => {
                let mut envelope = Envelope::new(EmptyMessage)
                    .with_received(received)
                    .with_message_stamp(message_stamp)
                    .with_broker_properties(properties);
                if let Some(id) = message_id {
                    envelope = envelope.with_transport_message_id(id);
                }
                Err(TransportError::Decoding {
                    envelope: Box::new(envelope),
                    source,
                })
            }
        }
    }

    /// Acknowledges a received message by deleting it from the broker.
    ///
    /// # Errors
    ///
    /// See [`Transport::reject`]; both operations run the identical deletion
    /// protocol, the broker distinguishes their semantics by receive mode
    /// and lock behavior.
    pub fn ack(&self, envelope: &Envelope<S::Message>) -> Result<(), TransportError> {
        self.delete(envelope)
    }

    /// Rejects a received message by deleting it from the broker.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Delete`] on HTTP failure and one of the
    /// three missing-context errors when the envelope lacks the metadata
    /// needed to build a deletion target.
    pub fn reject(&self, envelope: &Envelope<S::Message>) -> Result<(), TransportError> {
        self.delete(envelope)
    }

    /// Publishes an envelope to the sender endpoint.
    ///
    /// Returns the envelope augmented with a fresh [`MessageStamp`] carrying
    /// the sent body (no `Location` header is returned on send).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::EncodeProperties`] when the stamped broker
    /// properties cannot be encoded, [`TransportError::Encoding`] and
    /// [`TransportError::MissingEncodedBody`] for serializer contract
    /// failures, and [`TransportError::Send`] on HTTP failure.
    pub fn send(
        &self,
        envelope: Envelope<S::Message>,
    ) -> Result<Envelope<S::Message>, TransportError> {
        let mut headers = Headers::new();
        if let Some(properties) = envelope.broker_properties() {
            headers.insert(BROKER_PROPERTIES_HEADER.to_string(), properties.encode()?);
        }

        let encoded = self
            .serializer
            .encode(&envelope)
            .map_err(|source| TransportError::Encoding {
                source,
            })?;
        let Some(body) = encoded.body else {
            return Err(TransportError::MissingEncodedBody);
        };
        // Serializer headers must not be silently dropped; they win on
        // collision with the BrokerProperties header.
        for (name, value) in encoded.headers {
            headers.insert(name, value);
        }

        self.sender
            .request(HttpRequest {
                method: HttpMethod::Post,
                url: "messages".to_string(),
                headers,
                body: Some(body.clone()),
            })
            .map_err(|source| TransportError::Send {
                source,
            })?;

        Ok(envelope.with_message_stamp(MessageStamp::new(
            self.entity_path.clone(),
            body,
            self.subscription.clone(),
            None,
        )))
    }

    /// Deletes a peek-locked message; a no-op under receive-and-delete.
    fn delete(&self, envelope: &Envelope<S::Message>) -> Result<(), TransportError> {
        if self.receive_mode == ReceiveMode::ReceiveAndDelete {
            return Ok(());
        }

        let target = delete_target(envelope)?;
        self.receiver
            .request(HttpRequest {
                method: HttpMethod::Delete,
                url: target,
                headers: Headers::new(),
                body: None,
            })
            .map_err(|source| TransportError::Delete {
                source,
            })?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Deletion Target
// ============================================================================

/// Computes the deletion target for an envelope.
///
/// Prefers the stamped `Location` header; otherwise builds
/// `messages/{identifier}/{lock_token}` from the broker properties.
fn delete_target<M>(envelope: &Envelope<M>) -> Result<String, TransportError> {
    if let Some(stamp) = envelope.message_stamp()
        && let Some(location) = stamp.location()
    {
        return Ok(location.to_string());
    }

    let Some(properties) = envelope.broker_properties() else {
        return Err(TransportError::MissingDeleteContext);
    };
    let identifier = properties
        .message_id
        .clone()
        .or_else(|| properties.sequence_number.map(|number| number.to_string()));
    let Some(identifier) = identifier else {
        return Err(TransportError::MissingMessageIdentifier);
    };
    let Some(lock_token) = properties.lock_token.as_deref() else {
        return Err(TransportError::MissingLockToken);
    };

    Ok(format!("messages/{identifier}/{lock_token}"))
}
