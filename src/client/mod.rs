//! Client facade and configuration.
//!
//! This module provides the main entry point for opening connections.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Client`] | Configured client, ready to connect |
//! | [`ClientBuilder`] | Fluent configuration builder |
//! | [`ClientOptions`] | Validated connection configuration |
//! | [`Session`] | Owning guard for a background connection |
//!
//! # Example
//!
//! ```no_run
//! use sockline::{Client, Result};
//! # use sockline::Handler;
//! # struct MyHandler;
//! # impl Handler for MyHandler {}
//!
//! # async fn example() -> Result<()> {
//! let session = Client::builder()
//!     .uri("wss://example.com/socket")
//!     .build()?
//!     .connect(MyHandler)
//!     .await?;
//!
//! session.send_text("hello");
//! session.closed().await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for client configuration.
pub mod builder;

/// Core client implementation.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{ClientBuilder, ClientOptions};
pub use core::{Client, Session};
