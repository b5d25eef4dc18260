//! Umami analytics tracker for Rust.
//!
//! Sends page views, custom events and identify calls to an Umami server as
//! JSON envelopes (`{"type": ..., "payload": ...}`) POSTed to
//! `<host_url>/api/send`.
//!
//! # Example
//!
//! ```rust,ignore
//! use umami::{ClientConfig, EnvironmentSnapshot, EventData, Payload, Umami};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), umami::Error> {
//!     let mut client = Umami::builder()
//!         .config(ClientConfig::builder("site_123").host_url("https://stats.example.com").build()?)
//!         .environment(EnvironmentSnapshot::new().hostname("example.com").url("/"))
//!         .build();
//!
//!     client.track_page_view(None).await?;
//!     client.track_event("signup", Some(EventData::new().property("plan", "pro"))).await?;
//!     client.identify(EventData::new().property("userId", "usr_123")).await?;
//!     client.reset();
//!     Ok(())
//! }
//! ```

mod builders;
mod client;
mod config;
mod environment;
mod error;
mod transport;
pub mod types;

pub use builders::Track;
pub use client::{SendFuture, Umami, UmamiBuilder};
pub use config::{default_user_agent, ClientConfig, ConfigBuilder, DEFAULT_HOST_URL, SEND_PATH};
pub use environment::{Environment, EnvironmentSnapshot, Screen};
pub use error::Error;
pub use transport::{HttpTransport, Request, Response, Transport};
pub use types::{DataValue, EventData, EventKind, Payload};

use std::sync::OnceLock;
use tokio::sync::Mutex;

static SHARED: OnceLock<Mutex<Umami>> = OnceLock::new();

/// Process-wide default client.
///
/// Created unconfigured on first use and never reset, so state set by one
/// caller (configuration, identity properties) is seen by every other.
/// Tests and callers that need isolation should construct their own
/// [`Umami`] instead.
///
/// ```rust,no_run
/// # async fn example() -> Result<(), umami::Error> {
/// let mut client = umami::shared().lock().await;
/// client.configure(umami::ClientConfig::builder("site_123").build()?);
/// client.track_page_view(None).await?;
/// # Ok(())
/// # }
/// ```
pub fn shared() -> &'static Mutex<Umami> {
    SHARED.get_or_init(|| Mutex::new(Umami::default()))
}
