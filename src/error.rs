//! Error types for sockline.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use sockline::{Client, Result};
//!
//! async fn example() -> Result<()> {
//!     let client = Client::builder()
//!         .uri("wss://example.com/socket")
//!         .build()?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::Uri`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`] |
//! | Serialization | [`Error::Encoding`] |
//! | External | [`Error::WebSocket`] |
//!
//! Note that outbound operations on a closed connection are deliberately
//! *not* errors: [`Connection::send_text`](crate::Connection::send_text) and
//! friends silently drop frames once the connection has closed, so teardown
//! races never surface as failures.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when client configuration is invalid or incomplete.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Invalid or unsupported WebSocket URI.
    ///
    /// Returned when the configured URI does not parse or does not use the
    /// `ws`/`wss` scheme.
    #[error("Invalid WebSocket URI {uri:?}: {message}")]
    Uri {
        /// The offending URI.
        uri: String,
        /// Description of the problem.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    ///
    /// Returned when the connection cannot be established.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Connection timeout.
    ///
    /// Returned when the handshake does not complete within the configured
    /// connect timeout.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// Payload could not be encoded as JSON, or inbound text was not a valid
    /// envelope.
    ///
    /// Raised to the caller of
    /// [`JsonConnection::send_json`](crate::JsonConnection::send_json) before
    /// any data is sent.
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    // ========================================================================
    // External Errors
    // ========================================================================
    /// WebSocket protocol or transport error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid URI error.
    #[inline]
    pub fn uri(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Uri {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ConnectionTimeout { .. })
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::ConnectionTimeout { .. } | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this is an encoding error.
    #[inline]
    #[must_use]
    pub fn is_encoding_error(&self) -> bool {
        matches!(self, Self::Encoding(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "Connection failed: failed to connect");
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("missing URI");
        assert_eq!(err.to_string(), "Configuration error: missing URI");
    }

    #[test]
    fn test_uri_error() {
        let err = Error::uri("http://example.com", "unsupported scheme: http");
        assert!(err.to_string().contains("http://example.com"));
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_is_timeout() {
        let timeout_err = Error::connection_timeout(5000);
        let other_err = Error::connection("test");

        assert!(timeout_err.is_timeout());
        assert!(!other_err.is_timeout());
    }

    #[test]
    fn test_is_connection_error() {
        let conn_err = Error::connection("test");
        let timeout_err = Error::connection_timeout(1000);
        let other_err = Error::config("test");

        assert!(conn_err.is_connection_error());
        assert!(timeout_err.is_connection_error());
        assert!(!other_err.is_connection_error());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.is_encoding_error());
        assert!(!err.is_connection_error());
    }
}
