//! HTTP transport for sending payloads.

use crate::Error;
use async_trait::async_trait;
use reqwest::Method;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Outbound request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Request {
    /// Create a POST request with the given body.
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Raw response returned to the caller, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl Response {
    /// Create a response.
    pub fn new(status: u16, headers: BTreeMap<String, String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get all headers.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Get the raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Sends requests to the collection server.
///
/// Implementations report network failures as errors but must return
/// non-2xx responses as ordinary [`Response`] values.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, Error>;
}

/// Default [`Transport`] backed by reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport without a request timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that aborts requests after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response, Error> {
        debug!(url = %request.url, bytes = request.body.len(), "sending payload");

        let mut builder = self.client.request(request.method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body).send().await?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        if status.is_success() {
            debug!(status = %status, "payload accepted");
        } else {
            warn!(status = %status, "collection endpoint returned an error status");
        }

        Ok(Response::new(status.as_u16(), headers, body.to_vec()))
    }
}
