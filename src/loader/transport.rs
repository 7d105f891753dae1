//! Listing Transports
//!
//! Two ways of fetching the same `{ ok, rows }` envelope: a plain request
//! that reads the response body, and a callback-style request whose response
//! is a script invoking a named callback with the envelope.

use super::registry::CallbackRegistry;
use super::types::ListingEnvelope;
use crate::error::{DirectoryError, Result};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<ListingEnvelope>> + Send + 'a>>;

pub trait Transport: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetches the listing. Resolves only to an envelope with `ok == true`.
    fn fetch<'a>(&'a self, endpoint: &'a str) -> TransportFuture<'a>;
}

/// `<endpoint>?activeOnly=true`, keeping any query string already present.
pub fn listing_url(endpoint: &str) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!("{}{}activeOnly=true", endpoint, separator)
}

pub struct DirectTransport {
    client: reqwest::Client,
}

impl DirectTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for DirectTransport {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn fetch<'a>(&'a self, endpoint: &'a str) -> TransportFuture<'a> {
        Box::pin(async move {
            let response = self.client.get(listing_url(endpoint)).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(DirectoryError::Transport(format!("HTTP {}", status)));
            }

            let body = response.text().await?;
            ListingEnvelope::from_body(&body)?.ensure_ok()
        })
    }
}

pub struct CallbackTransport {
    client: reqwest::Client,
    registry: Arc<CallbackRegistry>,
    timeout: Option<Duration>,
}

impl CallbackTransport {
    pub fn new(
        client: reqwest::Client,
        registry: Arc<CallbackRegistry>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            client,
            registry,
            timeout,
        }
    }

    async fn load_script(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Transport(format!("script load failed: HTTP {}", status)));
        }
        Ok(response.text().await?)
    }
}

impl Transport for CallbackTransport {
    fn name(&self) -> &'static str {
        "callback"
    }

    fn fetch<'a>(&'a self, endpoint: &'a str) -> TransportFuture<'a> {
        Box::pin(async move {
            // Registered before the request goes out; `pending` unregisters
            // on every early return below.
            let pending = self.registry.register();
            let url = format!(
                "{}&callback={}&t={}",
                listing_url(endpoint),
                urlencoding::encode(pending.name()),
                timestamp_ms()
            );

            let script = self.load_script(&url).await?;
            if !self.registry.dispatch_script(&script)? {
                tracing::warn!(
                    "Script for {} did not invoke its callback, waiting",
                    pending.name()
                );
            }

            let payload = pending.wait(self.timeout).await?;
            ListingEnvelope::from_value(payload)?.ensure_ok()
        })
    }
}

fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
