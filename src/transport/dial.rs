//! WebSocket dialing.
//!
//! This module turns configured [`ClientOptions`] into an established
//! socket: it builds the HTTP upgrade request with any extra headers,
//! performs the TCP/TLS handshake via `tokio-tungstenite`, and bounds the
//! whole exchange with the configured connect timeout.

// ============================================================================
// Imports
// ============================================================================

use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tracing::{debug, info};

use crate::client::ClientOptions;
use crate::error::{Error, Result};

use super::connection::Socket;

// ============================================================================
// Dial
// ============================================================================

/// Establishes a WebSocket connection for the given options.
///
/// # Errors
///
/// - [`Error::ConnectionTimeout`] if the handshake does not complete within
///   the configured connect timeout
/// - [`Error::WebSocket`] if the TCP/TLS connection or HTTP upgrade fails
pub(crate) async fn dial(options: &ClientOptions) -> Result<Socket> {
    let mut request = options.uri().into_client_request()?;
    for (name, value) in options.headers() {
        request.headers_mut().append(name.clone(), value.clone());
    }

    debug!(uri = options.uri(), "Dialing WebSocket endpoint");

    let connect_timeout = options.connect_timeout();
    let (socket, response) = timeout(connect_timeout, connect_async(request))
        .await
        .map_err(|_| Error::connection_timeout(connect_timeout.as_millis() as u64))?
        .map_err(|e| Error::connection(format!("WebSocket handshake failed: {e}")))?;

    info!(
        uri = options.uri(),
        status = response.status().as_u16(),
        "WebSocket connection established"
    );

    Ok(socket)
}

// ============================================================================
// Tests
// ============================================================================
