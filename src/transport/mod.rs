//! WebSocket transport layer.
//!
//! This module connects the crate to the underlying WebSocket library and
//! owns the connection lifecycle: dialing, the event loop, and bulk
//! shutdown.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                             ┌──────────────────┐
//! │  Application     │   Connection (commands)     │  Event loop      │
//! │                  │────────────────────────────►│                  │
//! │  Handler hooks   │◄────────────────────────────│  owns socket     │
//! │                  │   on_message / on_close …   │  (read + write)  │
//! └──────────────────┘                             └──────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `dial` - TCP/TLS handshake and HTTP upgrade (timeout-bounded)
//! 2. `Connection::channel` - handle + command channel
//! 3. `event_loop` - dispatch inbound frames, apply outbound commands
//! 4. Close - one-way transition, triggered locally or by the peer
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Connection handle and event loop |
//! | `dial` | WebSocket dialing and handshake |
//! | `group` | Bulk-shutdown coordination |

// ============================================================================
// Submodules
// ============================================================================

/// Connection handle and event loop.
pub mod connection;

/// WebSocket dialing and handshake.
pub(crate) mod dial;

/// Bulk-shutdown coordination.
pub mod group;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{CloseReason, Connection};
pub use group::ConnectionGroup;

/// WebSocket close codes, re-exported from the underlying transport.
pub use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
