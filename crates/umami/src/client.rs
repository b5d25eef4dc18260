//! Umami client implementation.

use crate::builders::{self, Track};
use crate::config::ClientConfig;
use crate::environment::{Environment, EnvironmentSnapshot};
use crate::transport::{HttpTransport, Request, Response, Transport};
use crate::types::{Envelope, EventData, EventKind, Payload};
use crate::Error;
use serde_json::Value;
use std::fmt;
use std::future::{self, Future};
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Future resolving to the raw transport response.
///
/// The request is only sent when the future is polled: await it or hand it
/// to `tokio::spawn`. Dropping it cancels the send. It owns everything it
/// needs, so it does not borrow the client.
pub type SendFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send + 'static>>;

/// Umami analytics client.
///
/// Payloads are built and client state is updated synchronously when a
/// tracking method is called; the returned [`SendFuture`] only performs the
/// HTTP request, and only once it is awaited or spawned. Methods that change
/// state take `&mut self`, so sharing one client between tasks needs external
/// locking (see [`crate::shared`]).
///
/// # Example
///
/// ```rust,no_run
/// use umami::{ClientConfig, EventData, Payload, Umami};
///
/// #[tokio::main]
/// async fn main() -> Result<(), umami::Error> {
///     let config = ClientConfig::builder("site_123")
///         .host_url("https://stats.example.com")
///         .build()?;
///     let mut client = Umami::new(config);
///
///     client.track_page_view(Some(Payload::new().title("Pricing"))).await?;
///
///     client
///         .track("signup", Some(EventData::new().property("plan", "pro")))
///         .await?;
///
///     let response = client
///         .identify(EventData::new().property("userId", "usr_123"))
///         .await?;
///     assert!(response.is_success());
///     Ok(())
/// }
/// ```
pub struct Umami {
    config: ClientConfig,
    properties: EventData,
    environment: Arc<dyn Environment>,
    transport: Arc<dyn Transport>,
}

impl Umami {
    /// Create a client with the default environment and HTTP transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Create a new builder.
    pub fn builder() -> UmamiBuilder {
        UmamiBuilder::new()
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the accumulated identity properties.
    pub fn properties(&self) -> &EventData {
        &self.properties
    }

    // ============================================
    // STATE
    // ============================================

    /// Replace the configuration.
    ///
    /// Fields not set in `config` fall back to their defaults; nothing is
    /// carried over from the previous configuration. Identity properties are
    /// kept.
    #[instrument(skip(self), fields(site_id = %config.site_id()))]
    pub fn configure(&mut self, config: ClientConfig) {
        info!(host_url = %config.host_url(), "configuring client");
        self.config = config;
    }

    /// Clear the identity properties. Configuration is kept.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        debug!(cleared = self.properties.len(), "resetting identity properties");
        self.properties.clear();
    }

    // ============================================
    // TRACK
    // ============================================

    /// Track a page view.
    ///
    /// The environment snapshot provides defaults; fields set in `overrides`
    /// replace them.
    pub fn track_page_view(&self, overrides: Option<Payload>) -> SendFuture {
        let payload = builders::page_view(&self.environment.snapshot(), overrides);
        self.send(payload, EventKind::Event)
    }

    /// Track a named event together with the environment snapshot.
    pub fn track_event(&self, name: impl Into<String>, data: Option<EventData>) -> SendFuture {
        let payload = builders::named_event(&self.environment.snapshot(), name, data);
        self.send(payload, EventKind::Event)
    }

    /// Track an event by name, or send a prebuilt payload as-is.
    ///
    /// `data` is attached to named events and ignored for payloads. The
    /// environment is not consulted in either case.
    ///
    /// ```rust,no_run
    /// # use umami::{EventData, Payload, Umami};
    /// # async fn example(client: &Umami) -> Result<(), umami::Error> {
    /// client.track("click", Some(EventData::new().property("x", 1))).await?;
    /// client.track(Payload::new().title("Checkout"), None).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn track(&self, event: impl Into<Track>, data: Option<EventData>) -> SendFuture {
        let event: Track = event.into();
        let event = match data {
            Some(data) => event.with_data(data),
            None => event,
        };
        self.send(event.build(), EventKind::Event)
    }

    /// Like [`track`](Self::track), for inputs whose shape is only known at
    /// runtime.
    ///
    /// A JSON string is an event name and a JSON object a payload. Any other
    /// value resolves to [`Error::InvalidPayload`] without a network call.
    pub fn track_value(&self, event: Value, data: Option<EventData>) -> SendFuture {
        match Track::try_from(event) {
            Ok(track) => self.track(track, data),
            Err(e) => {
                debug!(error = %e, "rejecting track call");
                Box::pin(future::ready(Err(e)))
            }
        }
    }

    // ============================================
    // IDENTIFY
    // ============================================

    /// Merge `properties` into the identity properties and send all of them.
    ///
    /// The merge is kept even if the request fails.
    #[instrument(skip(self, properties), fields(count = properties.len()))]
    pub fn identify(&mut self, properties: EventData) -> SendFuture {
        self.properties.merge(properties);
        let payload = builders::identify(self.config.session_id(), &self.properties);
        self.send(payload, EventKind::Identify)
    }

    // ============================================
    // INTERNAL
    // ============================================

    fn send(&self, mut payload: Payload, kind: EventKind) -> SendFuture {
        payload.extra.remove("website");
        payload.website = Some(self.config.site_id().to_string());

        let body = match serde_json::to_string(&Envelope {
            kind,
            payload: &payload,
        }) {
            Ok(body) => body,
            Err(e) => return Box::pin(future::ready(Err(e.into()))),
        };

        let request = Request::post(self.config.send_url(), body)
            .header("Content-Type", "application/json")
            .header("User-Agent", self.config.effective_user_agent());

        debug!(url = %request.url, kind = ?kind, "dispatching payload");

        let transport = Arc::clone(&self.transport);
        Box::pin(async move { transport.send(request).await })
    }
}

impl Default for Umami {
    /// Unconfigured client pointed at [`DEFAULT_HOST_URL`](crate::config::DEFAULT_HOST_URL).
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl fmt::Debug for Umami {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Umami")
            .field("config", &self.config)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Umami`].
pub struct UmamiBuilder {
    config: ClientConfig,
    environment: Option<Arc<dyn Environment>>,
    transport: Option<Arc<dyn Transport>>,
}

impl UmamiBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            environment: None,
            transport: None,
        }
    }

    /// Set the initial configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the environment snapshot provider.
    pub fn environment(mut self, environment: impl Environment + 'static) -> Self {
        self.environment = Some(Arc::new(environment));
        self
    }

    /// Set the transport.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build the client.
    pub fn build(self) -> Umami {
        Umami {
            config: self.config,
            properties: EventData::new(),
            environment: self
                .environment
                .unwrap_or_else(|| Arc::new(EnvironmentSnapshot::default())),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(HttpTransport::new())),
        }
    }
}

impl Default for UmamiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
