//! Event handler hooks for incoming frames.
//!
//! Instead of subclassing a client base class, consumers implement the
//! [`Handler`] trait and override only the hooks they care about. Every hook
//! has a default implementation: the data hooks log a warning when frames
//! arrive unhandled, the lifecycle hooks default to no-ops.
//!
//! Hooks run on the connection's event loop with no lock held, so a handler
//! may freely call back into the [`Connection`] it receives - including
//! closing it from inside [`on_ping`](Handler::on_ping) or sending a reply
//! from inside [`on_message`](Handler::on_message).

// ============================================================================
// Imports
// ============================================================================

use tokio_tungstenite::tungstenite::Bytes;
use tracing::warn;

use crate::transport::{CloseReason, Connection};

// ============================================================================
// Handler
// ============================================================================

/// Hooks invoked by the event loop for each incoming frame.
///
/// # Example
///
/// ```no_run
/// use sockline::{Connection, Handler};
///
/// struct Echo;
///
/// impl Handler for Echo {
///     fn on_message(&mut self, connection: &Connection, text: String) {
///         connection.send_text(text);
///     }
/// }
/// ```
pub trait Handler {
    /// Called for each binary frame.
    ///
    /// Default: logs a warning that the frame went unhandled.
    fn on_binary(&mut self, connection: &Connection, payload: Bytes) {
        warn!(
            id = %connection.id(),
            len = payload.len(),
            "Binary frame received but not handled"
        );
    }

    /// Called for each text frame.
    ///
    /// Default: logs a warning that the frame went unhandled.
    fn on_message(&mut self, connection: &Connection, text: String) {
        warn!(
            id = %connection.id(),
            len = text.len(),
            "Text frame received but not handled"
        );
    }

    /// Called for each ping frame.
    ///
    /// The transport answers pings with pongs on its own; this hook is
    /// notification only. Default: no-op.
    fn on_ping(&mut self, connection: &Connection, payload: Bytes) {
        let _ = (connection, payload);
    }

    /// Called for each pong frame.
    ///
    /// Default: no-op.
    fn on_pong(&mut self, connection: &Connection, payload: Bytes) {
        let _ = (connection, payload);
    }

    /// Called exactly once when the connection closes.
    ///
    /// `reason` carries the peer's close code and text, a synthetic
    /// abnormal-closure reason on transport failure, or `None` when the
    /// stream simply ended. By the time this hook runs the connection is
    /// already closed, so any send attempted from inside it is a no-op.
    ///
    /// Default: no-op.
    fn on_close(&mut self, connection: &Connection, reason: Option<CloseReason>) {
        let _ = (connection, reason);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::identifiers::ConnectionId;

    /// Overrides nothing; exercises every default hook body.
    struct Defaults;

    impl Handler for Defaults {}

    #[test]
    fn test_default_hooks_do_not_panic() {
        let (connection, _command_rx) = Connection::channel(ConnectionId::next());
        let mut handler = Defaults;

        handler.on_binary(&connection, Bytes::from_static(&[1, 2]));
        handler.on_message(&connection, "hello".to_owned());
        handler.on_ping(&connection, Bytes::new());
        handler.on_pong(&connection, Bytes::new());
        handler.on_close(&connection, None);
    }
}
