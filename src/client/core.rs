//! Core client implementation.
//!
//! [`Client`] dials the configured endpoint and hands the socket to the
//! transport event loop, either inline ([`run`](Client::run)) or on a
//! spawned task ([`connect`](Client::connect)). A background connection is
//! owned by a [`Session`] guard that closes it deterministically when the
//! owning scope exits.

// ============================================================================
// Imports
// ============================================================================

use std::ops::Deref;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::Result;
use crate::handler::Handler;
use crate::identifiers::ConnectionId;
use crate::transport::connection::{event_loop, Connection};
use crate::transport::dial::dial;

use super::builder::{ClientBuilder, ClientOptions};

// ============================================================================
// Client
// ============================================================================

/// A configured WebSocket client, ready to connect.
///
/// Created via [`Client::builder()`]. Connecting consumes the client; a new
/// connection attempt requires a new client.
///
/// # Modes
///
/// - [`run`](Client::run): foreground - drives the connection inline and
///   returns when it closes. Suits script-style clients.
/// - [`connect`](Client::connect): background - spawns the event loop and
///   returns a [`Session`] immediately.
#[derive(Debug)]
pub struct Client {
    /// Validated connection configuration.
    options: ClientOptions,
}

impl Client {
    /// Returns a builder for configuring a client.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from validated options.
    pub(crate) fn new(options: ClientOptions) -> Self {
        Self { options }
    }

    /// Connects and drives the event loop inline.
    ///
    /// Blocks until the connection closes - by a handler calling
    /// [`Connection::close`], by the peer closing, or by a transport
    /// failure. The handler receives the [`Connection`] in every hook.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionTimeout`](crate::Error::ConnectionTimeout) if the
    ///   handshake does not complete in time
    /// - [`Error::WebSocket`](crate::Error::WebSocket) if connecting fails
    pub async fn run<H: Handler>(self, handler: H) -> Result<()> {
        let socket = dial(&self.options).await?;
        let (connection, command_rx) = Connection::channel(ConnectionId::next());

        debug!(id = %connection.id(), "Running event loop in foreground");
        event_loop(socket, connection, command_rx, handler).await;
        Ok(())
    }

    /// Connects and spawns the event loop in the background.
    ///
    /// Returns as soon as the handshake completes. The returned [`Session`]
    /// owns the connection: dropping it performs a going-away shutdown.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Client::run).
    pub async fn connect<H>(self, handler: H) -> Result<Session>
    where
        H: Handler + Send + 'static,
    {
        let socket = dial(&self.options).await?;
        let (connection, command_rx) = Connection::channel(ConnectionId::next());

        debug!(id = %connection.id(), "Spawning event loop in background");
        let task = tokio::spawn(event_loop(
            socket,
            connection.clone(),
            command_rx,
            handler,
        ));

        Ok(Session { connection, task })
    }
}

// ============================================================================
// Session
// ============================================================================

/// Owning guard for a background connection.
///
/// Derefs to [`Connection`], so all outbound operations are available
/// directly. When the session is dropped while the connection is still open,
/// it sends a going-away close; detached [`Connection`] clones obtained via
/// [`connection`](Session::connection) never close anything on drop.
#[derive(Debug)]
pub struct Session {
    /// Handle to the live connection.
    connection: Connection,
    /// The spawned event loop task.
    task: JoinHandle<()>,
}

impl Session {
    /// Returns a detached handle to the connection.
    ///
    /// Handles are cheap to clone and safe to hand to other tasks (a ping
    /// loop, a command dispatcher). They do not keep the connection alive
    /// past the session guard.
    #[inline]
    #[must_use]
    pub fn connection(&self) -> Connection {
        self.connection.clone()
    }

    /// Waits until the connection closes.
    ///
    /// Consumes the session; the going-away shutdown on drop becomes a no-op
    /// because the connection is already closed.
    pub async fn closed(mut self) {
        if let Err(e) = (&mut self.task).await {
            debug!(id = %self.connection.id(), error = %e, "Event loop task failed");
        }
    }
}

impl Deref for Session {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.connection
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.connection.is_open() {
            debug!(id = %self.connection.id(), "Session dropped, closing connection");
            self.connection.graceful_shutdown("session dropped");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use serde_json::{json, Value};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::time::timeout;
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::WebSocketStream;

    use crate::protocol::{JsonConnection, JsonDispatcher, JsonHandler};

    /// Binds a loopback server and returns its URI plus the accept task.
    async fn loopback_server() -> (String, JoinHandle<WebSocketStream<TcpStream>>) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            tokio_tungstenite::accept_async(stream).await.expect("upgrade")
        });
        (format!("ws://{addr}"), server)
    }

    struct CloseOnMessage;

    impl Handler for CloseOnMessage {
        fn on_message(&mut self, connection: &Connection, _text: String) {
            connection.close(CloseCode::Normal, "done");
        }
    }

    #[tokio::test]
    async fn test_run_returns_when_peer_closes() {
        let (uri, server) = loopback_server().await;

        let client = Client::builder().uri(uri).build().expect("build");
        let run = tokio::spawn(client.run(CloseOnMessage));

        let mut server = server.await.expect("server task");
        server
            .send(Message::Text("wrap it up".into()))
            .await
            .expect("send");

        // Drain to completion so the closing handshake finishes.
        while let Some(frame) = server.next().await {
            if frame.is_err() {
                break;
            }
        }

        // Handler closes on first message; run must unblock.
        timeout(Duration::from_secs(5), run)
            .await
            .expect("run unblocks")
            .expect("no panic")
            .expect("run ok");
    }

    #[tokio::test]
    async fn test_session_drop_sends_going_away() {
        let (uri, server) = loopback_server().await;

        let client = Client::builder().uri(uri).build().expect("build");
        let session = client.connect(CloseOnMessage).await.expect("connect");
        assert!(session.is_open());

        drop(session);

        let mut server = server.await.expect("server task");
        match timeout(Duration::from_secs(5), server.next())
            .await
            .expect("frame within timeout")
        {
            Some(Ok(Message::Close(Some(frame)))) => {
                assert_eq!(frame.code, CloseCode::Away);
                assert_eq!(frame.reason.as_str(), "session dropped");
            }
            other => panic!("expected going-away close, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_session_closed_waits_for_peer_close() {
        let (uri, server) = loopback_server().await;

        let client = Client::builder().uri(uri).build().expect("build");
        let session = client.connect(CloseOnMessage).await.expect("connect");
        let connection = session.connection();

        let mut server = server.await.expect("server task");
        server.send(Message::Close(None)).await.expect("close");

        timeout(Duration::from_secs(5), session.closed())
            .await
            .expect("session closes");
        assert!(!connection.is_open());
    }

    /// Records routed JSON-layer events.
    struct JsonRecorder {
        events: std_mpsc::Sender<String>,
    }

    impl JsonHandler for JsonRecorder {
        fn on_text(&mut self, connection: &JsonConnection, message: String) {
            let _ = self.events.send(format!("text:{message}"));
            if message == "over" {
                connection.close(CloseCode::Normal, "conversation over");
            }
        }

        fn on_json(&mut self, _connection: &JsonConnection, kind: &str, data: Value) {
            let _ = self.events.send(format!("json:{kind}:{data}"));
        }
    }

    #[tokio::test]
    async fn test_json_layer_round_trip_over_loopback() {
        let (uri, server) = loopback_server().await;

        let (events, rx) = std_mpsc::channel();
        let client = Client::builder().uri(uri).build().expect("build");
        let session = client
            .connect(JsonDispatcher::new(JsonRecorder { events }))
            .await
            .expect("connect");

        let json_connection = JsonConnection::new(session.connection());
        json_connection.send_text("hello").expect("send_text");
        json_connection
            .send_json("ping-event", &json!({ "n": 1 }))
            .expect("send_json");

        // Echo both envelopes back, then a $text$ that makes the handler
        // close, then drain until the close handshake completes.
        let mut server = server.await.expect("server task");
        for _ in 0..2 {
            let frame = timeout(Duration::from_secs(5), server.next())
                .await
                .expect("frame within timeout")
                .expect("stream open")
                .expect("frame ok");
            server.send(frame).await.expect("echo");
        }
        server
            .send(Message::Text(r#"{"type":"$text$","data":"over"}"#.into()))
            .await
            .expect("send over");
        while let Some(frame) = server.next().await {
            if frame.is_err() {
                break;
            }
        }

        timeout(Duration::from_secs(5), session.closed())
            .await
            .expect("session closes");

        let events: Vec<String> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                "text:hello",
                r#"json:ping-event:{"n":1}"#,
                "text:over"
            ]
        );
    }
}
