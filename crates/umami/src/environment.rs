//! Host environment snapshots used as payload defaults.

use crate::types::Payload;
use std::fmt;

/// Screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
}

impl Screen {
    /// Create screen dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Ambient values describing the current page.
///
/// The default snapshot is empty, which suits server-side callers that have
/// no page context: every field is then left out of the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    pub hostname: Option<String>,
    pub language: Option<String>,
    pub referrer: Option<String>,
    pub screen: Option<Screen>,
    pub title: Option<String>,
    /// Current path.
    pub url: Option<String>,
}

impl EnvironmentSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hostname.
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Set the preferred language tag.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the referrer.
    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// Set the screen dimensions.
    pub fn screen(mut self, width: u32, height: u32) -> Self {
        self.screen = Some(Screen::new(width, height));
        self
    }

    /// Set the document title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the current path.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Default payload fields derived from this snapshot.
    pub fn to_payload(&self) -> Payload {
        Payload {
            hostname: self.hostname.clone(),
            language: self.language.clone(),
            referrer: self.referrer.clone(),
            screen: self.screen.map(|s| s.to_string()),
            title: self.title.clone(),
            url: self.url.clone(),
            ..Payload::default()
        }
    }
}

/// Source of environment snapshots.
///
/// Implementations must be cheap and side-effect free; a snapshot is taken
/// on every page view and named event.
pub trait Environment: Send + Sync {
    fn snapshot(&self) -> EnvironmentSnapshot;
}

/// A fixed snapshot is its own environment.
impl Environment for EnvironmentSnapshot {
    fn snapshot(&self) -> EnvironmentSnapshot {
        self.clone()
    }
}
