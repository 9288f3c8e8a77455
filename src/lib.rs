//! Sockline - event-driven WebSocket client wrapper.
//!
//! This library is a thin convenience layer over `tokio-tungstenite`: it
//! wires incoming frames to overridable handler hooks, serializes all
//! outbound traffic through one event loop, and optionally frames payloads
//! in a typed JSON envelope sub-protocol.
//!
//! The WebSocket protocol itself (framing, masking, fragmentation, the
//! upgrade handshake, ping auto-response) is entirely the transport
//! library's job; this crate only owns the glue.
//!
//! # Architecture
//!
//! - Each connection is driven by one event loop task that owns the socket
//! - [`Connection`] handles are cheap clones; outbound calls never block
//! - The close transition is one-way: once closed, every outbound operation
//!   is a silent no-op and a new connection requires a new [`Client`]
//! - Handler hooks run on the event loop with no lock held, so they can
//!   freely send or close from inside a callback
//!
//! # Quick Start
//!
//! ```no_run
//! use sockline::{Client, Connection, Handler, Result};
//!
//! struct Echo;
//!
//! impl Handler for Echo {
//!     fn on_message(&mut self, connection: &Connection, text: String) {
//!         connection.send_text(text);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Runs in the foreground until the connection closes.
//!     Client::builder()
//!         .uri("wss://echo.example.com/socket")
//!         .build()?
//!         .run(Echo)
//!         .await
//! }
//! ```
//!
//! For background use, [`Client::connect`] returns a [`Session`] guard that
//! closes the connection when dropped. For the JSON sub-protocol, wrap a
//! [`JsonHandler`] in a [`JsonDispatcher`] and send through a
//! [`JsonConnection`].
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client facade: [`Client`], [`ClientBuilder`], [`Session`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`handler`] | [`Handler`] hook trait |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | JSON envelope sub-protocol |
//! | [`transport`] | Connection handle, event loop, bulk shutdown |

// ============================================================================
// Modules
// ============================================================================

/// Client facade and configuration.
///
/// Use [`Client::builder()`] to configure and open connections.
pub mod client;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Event handler hooks for incoming frames.
pub mod handler;

/// Type-safe identifiers for connections.
pub mod identifiers;

/// JSON envelope sub-protocol.
pub mod protocol;

/// WebSocket transport layer.
///
/// Connection lifecycle, event loop, and bulk-shutdown coordination.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{Client, ClientBuilder, ClientOptions, Session};

// Error types
pub use error::{Error, Result};

// Handler types
pub use handler::Handler;

// Identifier types
pub use identifiers::ConnectionId;

// Protocol types
pub use protocol::{Envelope, JsonConnection, JsonDispatcher, JsonHandler, TEXT_TYPE};

// Transport types
pub use transport::{CloseCode, CloseReason, Connection, ConnectionGroup};

// Payload bytes, re-exported from the underlying transport
pub use tokio_tungstenite::tungstenite::Bytes;
