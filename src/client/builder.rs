//! Builder pattern for client configuration.
//!
//! Provides a fluent API for configuring and creating [`Client`] instances.
//!
//! # Example
//!
//! ```no_run
//! use sockline::Client;
//!
//! # fn example() -> sockline::Result<()> {
//! let client = Client::builder()
//!     .uri("wss://example.com/socket")
//!     .header("authorization", "Bearer token")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio_tungstenite::tungstenite::http::header::{HeaderName, HeaderValue};
use url::Url;

use crate::error::{Error, Result};

use super::core::Client;

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for the connect handshake.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// ClientOptions
// ============================================================================

/// Validated connection configuration.
///
/// Produced by [`ClientBuilder::build`]; consumed when dialing.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// WebSocket URI (`ws://` or `wss://`).
    uri: String,
    /// Extra headers for the upgrade request.
    headers: Vec<(HeaderName, HeaderValue)>,
    /// Timeout for the connect handshake.
    connect_timeout: Duration,
}

impl ClientOptions {
    /// Returns the configured URI.
    #[inline]
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the extra upgrade-request headers.
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    /// Returns the connect timeout.
    #[inline]
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for configuring a [`Client`] instance.
///
/// Use [`Client::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct ClientBuilder {
    /// WebSocket URI.
    uri: Option<String>,
    /// Extra headers, validated at build time.
    headers: Vec<(String, String)>,
    /// Connect timeout override.
    connect_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the WebSocket URI to connect to.
    ///
    /// The scheme must be `ws` or `wss`; TLS configuration follows from the
    /// scheme.
    #[inline]
    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Adds an extra header to the upgrade request.
    ///
    /// May be called multiple times; repeated names are appended, not
    /// replaced.
    #[inline]
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the timeout for the connect handshake.
    ///
    /// Defaults to 30 seconds.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Builds the client with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the URI is not set or a header is malformed
    /// - [`Error::Uri`] if the URI does not parse or uses an unsupported
    ///   scheme
    pub fn build(self) -> Result<Client> {
        Ok(Client::new(self.build_options()?))
    }

    /// Validates the configuration into [`ClientOptions`].
    pub(crate) fn build_options(self) -> Result<ClientOptions> {
        let uri = self
            .uri
            .ok_or_else(|| Error::config("WebSocket URI not set"))?;

        let parsed = Url::parse(&uri).map_err(|e| Error::uri(&uri, e.to_string()))?;
        match parsed.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(Error::uri(&uri, format!("unsupported scheme: {other}")));
            }
        }

        let mut headers = Vec::with_capacity(self.headers.len());
        for (name, value) in self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::config(format!("invalid header name {name:?}: {e}")))?;
            let header_value = HeaderValue::from_str(&value)
                .map_err(|e| Error::config(format!("invalid value for header {name:?}: {e}")))?;
            headers.push((header_name, header_value));
        }

        Ok(ClientOptions {
            uri,
            headers,
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
