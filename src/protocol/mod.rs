//! JSON envelope sub-protocol.
//!
//! An optional layer atop the transport that frames every payload as a
//! `{type, data}` JSON object sent in a text frame.
//!
//! # Protocol Overview
//!
//! | Envelope type | Routed to |
//! |---------------|-----------|
//! | `$text$` | [`JsonHandler::on_text`] |
//! | anything else | [`JsonHandler::on_json`] |
//!
//! Inbound text that is not a valid envelope is logged and discarded - a
//! malformed message never crashes the connection.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `envelope` | The `{type, data}` message type |
//! | `json` | JSON-speaking connection wrapper, handler, dispatcher |

// ============================================================================
// Submodules
// ============================================================================

/// The `{type, data}` message type.
pub mod envelope;

/// JSON-speaking connection wrapper, handler trait, and dispatcher.
pub mod json;

// ============================================================================
// Re-exports
// ============================================================================

pub use envelope::{Envelope, TEXT_TYPE};
pub use json::{JsonConnection, JsonDispatcher, JsonHandler};
