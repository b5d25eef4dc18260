//! Error types for the Umami tracker.

/// Errors that can occur when using the Umami tracker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The tracking input was neither an event name nor a payload object.
    #[error("Invalid payload.")]
    InvalidPayload,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A custom transport failed.
    #[error("Transport failed: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Revenue fields in event data are malformed.
    #[error("Invalid revenue data: {0}")]
    InvalidRevenue(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
