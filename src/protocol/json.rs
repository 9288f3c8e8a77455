//! JSON sub-protocol layer.
//!
//! Composes the envelope codec onto a plain [`Connection`]:
//!
//! - [`JsonConnection`] wraps a connection and sends [`Envelope`]-framed
//!   payloads.
//! - [`JsonHandler`] is the capability interface for inbound payloads,
//!   routed by envelope type.
//! - [`JsonDispatcher`] adapts a [`JsonHandler`] to the transport-level
//!   [`Handler`], parsing inbound text frames and routing them.
//!
//! Malformed inbound JSON is logged and discarded; it never propagates into
//! the read loop and never closes the connection.

// ============================================================================
// Imports
// ============================================================================

use std::ops::Deref;

use serde::Serialize;
use serde_json::Value;
use tokio_tungstenite::tungstenite::Bytes;
use tracing::{debug, error, warn};

use crate::error::Result;
use crate::handler::Handler;
use crate::transport::{CloseReason, Connection};

use super::envelope::Envelope;

// ============================================================================
// JsonConnection
// ============================================================================

/// A connection handle that speaks the JSON envelope sub-protocol.
///
/// Wraps a [`Connection`] by composition; lifecycle operations (`close`,
/// `is_open`, `graceful_shutdown`, raw sends) remain available through
/// `Deref`.
///
/// # Example
///
/// ```no_run
/// # use sockline::{JsonConnection, Result};
/// # use serde_json::json;
/// # fn example(connection: sockline::Connection) -> Result<()> {
/// let json = JsonConnection::new(connection);
/// json.send_text("hello")?;
/// json.send_json("ping-event", &json!({ "n": 1 }))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JsonConnection {
    /// The wrapped transport-level connection.
    inner: Connection,
}

impl JsonConnection {
    /// Wraps a connection in the JSON envelope layer.
    #[inline]
    #[must_use]
    pub fn new(inner: Connection) -> Self {
        Self { inner }
    }

    /// Returns the wrapped connection.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Connection {
        self.inner
    }

    /// Sends a typed JSON payload as a `{type, data}` envelope.
    ///
    /// Serialization happens before anything is sent: a non-serializable
    /// payload fails fast and nothing reaches the wire. Once encoded, the
    /// send follows connection semantics - silently dropped if closed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`](crate::Error::Encoding) if `payload`
    /// cannot be encoded as JSON.
    pub fn send_json<T>(&self, kind: &str, payload: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let text = Envelope::from_payload(kind, payload)?.encode()?;
        self.inner.send_text(text);
        Ok(())
    }

    /// Sends plain text as a reserved `$text$` envelope.
    ///
    /// Equivalent to `send_json(TEXT_TYPE, message)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`](crate::Error::Encoding) on serialization
    /// failure.
    pub fn send_text(&self, message: impl Into<String>) -> Result<()> {
        let text = Envelope::text(message).encode()?;
        self.inner.send_text(text);
        Ok(())
    }
}

impl Deref for JsonConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.inner
    }
}

impl From<Connection> for JsonConnection {
    fn from(inner: Connection) -> Self {
        Self::new(inner)
    }
}

// ============================================================================
// JsonHandler
// ============================================================================

/// Hooks for inbound payloads routed by envelope type.
///
/// Defaults are diagnostic-logging stubs for the payload hooks and no-ops
/// for the lifecycle hooks, mirroring [`Handler`].
pub trait JsonHandler {
    /// Called for each `$text$` envelope.
    ///
    /// Default: logs that the message went unhandled.
    fn on_text(&mut self, connection: &JsonConnection, message: String) {
        debug!(
            id = %connection.id(),
            len = message.len(),
            "Text payload received but not handled"
        );
    }

    /// Called for each envelope with an application-defined type.
    ///
    /// Default: logs that the payload went unhandled.
    fn on_json(&mut self, connection: &JsonConnection, kind: &str, data: Value) {
        let _ = data;
        debug!(
            id = %connection.id(),
            kind,
            "JSON payload received but not handled"
        );
    }

    /// Called for each binary frame (the envelope layer is text-only).
    ///
    /// Default: logs a warning that the frame went unhandled.
    fn on_binary(&mut self, connection: &JsonConnection, payload: Bytes) {
        warn!(
            id = %connection.id(),
            len = payload.len(),
            "Binary frame received but not handled"
        );
    }

    /// Called for each ping frame. Default: no-op.
    fn on_ping(&mut self, connection: &JsonConnection, payload: Bytes) {
        let _ = (connection, payload);
    }

    /// Called for each pong frame. Default: no-op.
    fn on_pong(&mut self, connection: &JsonConnection, payload: Bytes) {
        let _ = (connection, payload);
    }

    /// Called exactly once when the connection closes. Default: no-op.
    fn on_close(&mut self, connection: &JsonConnection, reason: Option<CloseReason>) {
        let _ = (connection, reason);
    }
}

// ============================================================================
// JsonDispatcher
// ============================================================================

/// Adapts a [`JsonHandler`] to the transport-level [`Handler`].
///
/// Text frames are parsed as envelopes and routed: `$text$` to
/// [`JsonHandler::on_text`], everything else to [`JsonHandler::on_json`].
/// All other frames pass through to the same-named hooks.
#[derive(Debug)]
pub struct JsonDispatcher<H> {
    /// The wrapped payload handler.
    handler: H,
}

impl<H: JsonHandler> JsonDispatcher<H> {
    /// Wraps a payload handler for use with a client.
    #[inline]
    #[must_use]
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    /// Returns the wrapped handler.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> H {
        self.handler
    }
}

impl<H: JsonHandler> Handler for JsonDispatcher<H> {
    fn on_message(&mut self, connection: &Connection, text: String) {
        let envelope = match Envelope::decode(&text) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(id = %connection.id(), error = %e, "Discarding malformed envelope");
                return;
            }
        };

        let connection = JsonConnection::new(connection.clone());
        if envelope.is_text() {
            match envelope.data {
                Value::String(message) => self.handler.on_text(&connection, message),
                other => {
                    error!(
                        id = %connection.id(),
                        data = %other,
                        "Discarding $text$ envelope with non-string payload"
                    );
                }
            }
        } else {
            self.handler
                .on_json(&connection, &envelope.kind, envelope.data);
        }
    }

    fn on_binary(&mut self, connection: &Connection, payload: Bytes) {
        self.handler
            .on_binary(&JsonConnection::new(connection.clone()), payload);
    }

    fn on_ping(&mut self, connection: &Connection, payload: Bytes) {
        self.handler
            .on_ping(&JsonConnection::new(connection.clone()), payload);
    }

    fn on_pong(&mut self, connection: &Connection, payload: Bytes) {
        self.handler
            .on_pong(&JsonConnection::new(connection.clone()), payload);
    }

    fn on_close(&mut self, connection: &Connection, reason: Option<CloseReason>) {
        self.handler
            .on_close(&JsonConnection::new(connection.clone()), reason);
    }
}

// ============================================================================
// Tests
// ============================================================================
