//! Client configuration.

/// Default Umami host.
pub const DEFAULT_HOST_URL: &str = "https://cloud.umami.is";

/// Path of the collection endpoint, relative to the host URL.
pub const SEND_PATH: &str = "/api/send";

/// User agent sent when no override is configured.
pub fn default_user_agent() -> String {
    format!("Mozilla/5.0 Umami/{}", env!("CARGO_PKG_VERSION"))
}

/// Umami client configuration.
///
/// An empty `site_id` is allowed and marks an unconfigured client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub(crate) site_id: String,
    pub(crate) host_url: String,
    pub(crate) session_id: Option<String>,
    pub(crate) user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a new builder with the given site identifier.
    pub fn builder(site_id: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(site_id)
    }

    /// Get the site identifier.
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Get the host URL, without trailing slash.
    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    /// Get the session identifier.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Get the user agent override.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Full URL of the collection endpoint.
    pub fn send_url(&self) -> String {
        format!("{}{}", self.host_url, SEND_PATH)
    }

    /// User agent header value: the override if set, otherwise the default.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent.clone().unwrap_or_else(default_user_agent)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            site_id: String::new(),
            host_url: DEFAULT_HOST_URL.into(),
            session_id: None,
            user_agent: None,
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ConfigBuilder {
    site_id: String,
    host_url: Option<String>,
    session_id: Option<String>,
    user_agent: Option<String>,
}

impl ConfigBuilder {
    /// Create a new builder with the given site identifier.
    pub fn new(site_id: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            host_url: None,
            session_id: None,
            user_agent: None,
        }
    }

    /// Set the host URL of the Umami server.
    pub fn host_url(mut self, host: impl Into<String>) -> Self {
        self.host_url = Some(host.into());
        self
    }

    /// Set the session identifier sent with identify calls.
    pub fn session_id(mut self, session: impl Into<String>) -> Self {
        self.session_id = Some(session.into());
        self
    }

    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<ClientConfig, crate::Error> {
        let host_url = match self.host_url {
            Some(host) => normalize_host(&host)?,
            None => DEFAULT_HOST_URL.into(),
        };

        Ok(ClientConfig {
            site_id: self.site_id,
            host_url,
            session_id: self.session_id,
            user_agent: self.user_agent,
        })
    }
}

fn normalize_host(host: &str) -> Result<String, crate::Error> {
    let trimmed = host.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(crate::Error::Config("host_url cannot be empty".into()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(crate::Error::Config(format!(
            "host_url must be an http(s) URL, got {trimmed:?}"
        )));
    }
    Ok(trimmed.into())
}
