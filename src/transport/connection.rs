//! WebSocket connection handle and event loop.
//!
//! This module wires an established WebSocket socket to user handler hooks
//! and serializes all outbound traffic through a single event loop.
//!
//! # Event Loop
//!
//! The event loop owns both halves of the socket and handles:
//!
//! - Incoming frames, dispatched to the [`Handler`] hooks
//! - Outbound commands from any number of [`Connection`] handles
//! - The close transition, exactly once, in either direction
//!
//! # Close Semantics
//!
//! The write half lives in the loop as an `Option`. [`Connection::close`]
//! flips the open flag and the loop takes the sink out exactly once; every
//! outbound command that arrives after that observes absence and is dropped
//! with a trace log instead of touching a torn-down socket. The handle is
//! cleared *before* [`Handler::on_close`] runs, so sending from within the
//! close hook is a guaranteed no-op.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Bytes, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use crate::handler::Handler;
use crate::identifiers::ConnectionId;

// ============================================================================
// Types
// ============================================================================

/// An established client-side WebSocket socket.
pub(crate) type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of the socket, owned by the event loop.
type SocketSink = SplitSink<Socket, Message>;

// ============================================================================
// CloseReason
// ============================================================================

/// Code and reason text for a close transition.
///
/// Carries the peer's close frame contents for a remote close, or a synthetic
/// [`CloseCode::Abnormal`] reason when the transport fails without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReason {
    /// WebSocket close code.
    pub code: CloseCode,
    /// Human-readable reason text.
    pub reason: String,
}

impl CloseReason {
    /// Creates a close reason.
    #[inline]
    #[must_use]
    pub fn new(code: CloseCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// Converts a received close frame.
    #[inline]
    pub(crate) fn from_frame(frame: CloseFrame) -> Self {
        Self {
            code: frame.code,
            reason: frame.reason.as_str().to_owned(),
        }
    }

    /// Creates an abnormal-closure reason from a transport failure.
    #[inline]
    pub(crate) fn abnormal(message: impl Into<String>) -> Self {
        Self::new(CloseCode::Abnormal, message)
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.reason)
    }
}

// ============================================================================
// Command
// ============================================================================

/// Outbound commands for the event loop.
pub(crate) enum Command {
    /// Send a text frame.
    Text(String),
    /// Send a binary frame.
    Binary(Bytes),
    /// Send a ping frame.
    Ping(Bytes),
    /// Send a pong frame.
    Pong(Bytes),
    /// Close the connection with code and reason.
    Close(CloseReason),
}

// ============================================================================
// Connection
// ============================================================================

/// Handle to a live WebSocket connection.
///
/// All outbound operations are non-blocking: they enqueue a command for the
/// event loop, which is the sole owner of the socket's write half. Once the
/// connection closes, every outbound operation becomes a silent no-op.
///
/// # Thread Safety
///
/// `Connection` is `Send + Sync` and cheap to clone; clones share the same
/// underlying socket. Dropping a handle never closes the connection - that
/// is the job of [`Session`](crate::Session) or an explicit [`close`] call.
///
/// [`close`]: Connection::close
#[derive(Debug, Clone)]
pub struct Connection {
    /// Identifier for log correlation and group registration.
    id: ConnectionId,
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<Command>,
    /// Whether the connection is still open (snapshot, no lock).
    open: Arc<AtomicBool>,
}

impl Connection {
    /// Creates a connection handle and the command channel for its event loop.
    pub(crate) fn channel(id: ConnectionId) -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let connection = Self {
            id,
            command_tx,
            open: Arc::new(AtomicBool::new(true)),
        };
        (connection, command_rx)
    }

    /// Returns the connection's identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Returns whether the connection is currently open.
    ///
    /// This is a snapshot read; a concurrent close may flip it at any time.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Sends a text frame.
    ///
    /// Silently dropped if the connection is closed.
    pub fn send_text(&self, text: impl Into<String>) {
        self.dispatch(Command::Text(text.into()));
    }

    /// Sends a binary frame.
    ///
    /// Silently dropped if the connection is closed.
    pub fn send_binary(&self, payload: impl Into<Bytes>) {
        self.dispatch(Command::Binary(payload.into()));
    }

    /// Sends a ping frame.
    ///
    /// Silently dropped if the connection is closed.
    pub fn ping(&self, payload: impl Into<Bytes>) {
        self.dispatch(Command::Ping(payload.into()));
    }

    /// Sends an unsolicited pong frame.
    ///
    /// Inbound pings are already answered by the transport; this exists for
    /// peers that use pongs as unidirectional heartbeats.
    ///
    /// Silently dropped if the connection is closed.
    pub fn pong(&self, payload: impl Into<Bytes>) {
        self.dispatch(Command::Pong(payload.into()));
    }

    /// Closes the connection with the given code and reason.
    ///
    /// Idempotent: only the first call initiates the closing handshake;
    /// closing an already-closed connection is a no-op. Subsequent sends are
    /// silently dropped. [`Handler::on_close`] fires once the close completes
    /// (peer echo, or stream end).
    pub fn close(&self, code: CloseCode, reason: impl Into<String>) {
        if self.open.swap(false, Ordering::AcqRel) {
            let reason = CloseReason::new(code, reason);
            debug!(id = %self.id, code = ?reason.code, "Close requested");
            let _ = self.command_tx.send(Command::Close(reason));
        } else {
            trace!(id = %self.id, "Close on closed connection ignored");
        }
    }

    /// Closes the connection with the "going away" code.
    ///
    /// Used by [`Session`](crate::Session) when its scope exits and by
    /// [`ConnectionGroup::shutdown_all`](crate::ConnectionGroup::shutdown_all)
    /// during bulk teardown.
    pub fn graceful_shutdown(&self, reason: impl Into<String>) {
        self.close(CloseCode::Away, reason);
    }

    /// Marks the connection closed without sending anything.
    ///
    /// Called by the event loop when the close originates from the peer or
    /// from a transport failure.
    pub(crate) fn mark_closed(&self) {
        self.open.store(false, Ordering::Release);
    }

    /// Enqueues an outbound command, or drops it if the connection closed.
    fn dispatch(&self, command: Command) {
        if !self.is_open() {
            trace!(id = %self.id, "Outbound frame on closed connection dropped");
            return;
        }
        if self.command_tx.send(command).is_err() {
            trace!(id = %self.id, "Outbound frame dropped, event loop gone");
        }
    }
}

// ============================================================================
// Event Loop
// ============================================================================

/// Drives the socket until the connection closes.
///
/// Inbound frames are dispatched to `handler`; outbound commands are applied
/// to the write half. Returns when the close transition completes in either
/// direction.
pub(crate) async fn event_loop<H: Handler>(
    socket: Socket,
    connection: Connection,
    mut command_rx: mpsc::UnboundedReceiver<Command>,
    mut handler: H,
) {
    let id = connection.id();
    let (ws_write, mut ws_read) = socket.split();
    let mut sink = Some(ws_write);

    debug!(id = %id, "Event loop started");

    loop {
        tokio::select! {
            // Incoming frames from the peer
            frame = ws_read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        trace!(id = %id, len = text.len(), "Text frame received");
                        handler.on_message(&connection, text.as_str().to_owned());
                    }

                    Some(Ok(Message::Binary(payload))) => {
                        trace!(id = %id, len = payload.len(), "Binary frame received");
                        handler.on_binary(&connection, payload);
                    }

                    Some(Ok(Message::Ping(payload))) => {
                        // The transport queues the pong reply itself.
                        trace!(id = %id, "Ping received");
                        handler.on_ping(&connection, payload);
                    }

                    Some(Ok(Message::Pong(payload))) => {
                        trace!(id = %id, "Pong received");
                        handler.on_pong(&connection, payload);
                    }

                    Some(Ok(Message::Close(frame))) => {
                        debug!(id = %id, "Close frame received");
                        connection.mark_closed();
                        // Flush the close reply the transport queued, then
                        // clear the handle before the close hook runs.
                        if let Some(mut writer) = sink.take() {
                            let _ = writer.flush().await;
                        }
                        handler.on_close(&connection, frame.map(CloseReason::from_frame));
                        break;
                    }

                    // Raw frames do not surface on a non-raw read
                    Some(Ok(Message::Frame(_))) => {}

                    Some(Err(e)) => {
                        error!(id = %id, error = %e, "WebSocket error");
                        connection.mark_closed();
                        sink = None;
                        handler.on_close(&connection, Some(CloseReason::abnormal(e.to_string())));
                        break;
                    }

                    None => {
                        debug!(id = %id, "WebSocket stream ended");
                        connection.mark_closed();
                        sink = None;
                        handler.on_close(&connection, None);
                        break;
                    }
                }
            }

            // Outbound commands from Connection handles
            command = command_rx.recv() => {
                match command {
                    Some(command) => apply_command(id, command, &mut sink).await,

                    None => {
                        debug!(id = %id, "Command channel closed");
                        break;
                    }
                }
            }
        }
    }

    debug!(id = %id, "Event loop terminated");
}

/// Applies one outbound command to the write half.
///
/// The sink is taken out exactly once, by the close command or by a write
/// failure; afterwards every command observes absence and is discarded.
async fn apply_command(id: ConnectionId, command: Command, sink: &mut Option<SocketSink>) {
    let Some(writer) = sink.as_mut() else {
        trace!(id = %id, "Outbound frame after close discarded");
        return;
    };

    let result = match command {
        Command::Text(text) => writer.send(Message::Text(text.into())).await,
        Command::Binary(payload) => writer.send(Message::Binary(payload)).await,
        Command::Ping(payload) => writer.send(Message::Ping(payload)).await,
        Command::Pong(payload) => writer.send(Message::Pong(payload)).await,

        Command::Close(reason) => {
            trace!(id = %id, code = ?reason.code, "Sending close frame");
            let frame = CloseFrame {
                code: reason.code,
                reason: reason.reason.into(),
            };
            if let Err(e) = writer.send(Message::Close(Some(frame))).await {
                debug!(id = %id, error = %e, "Close frame not sent");
            }
            // Handle cleared; the read side delivers on_close when the
            // handshake completes.
            *sink = None;
            return;
        }
    };

    if let Err(e) = result {
        warn!(id = %id, error = %e, "Failed to write frame");
        *sink = None;
    }
}

// ============================================================================
// Tests
// ============================================================================
