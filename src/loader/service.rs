use super::registry::CallbackRegistry;
use super::transport::{CallbackTransport, DirectTransport, Transport};
use super::types::ListingEnvelope;
use crate::config::Config;
use crate::directory::category::{canonical_category, style_class_for};
use crate::directory::types::Record;
use crate::error::{DirectoryError, Result};

/// Fetches the company list, falling back to the secondary transport when
/// the primary one fails for any reason.
pub struct Loader {
    endpoint: Option<String>,
    primary: Box<dyn Transport>,
    fallback: Box<dyn Transport>,
}

impl Loader {
    pub fn new(
        endpoint: Option<String>,
        primary: Box<dyn Transport>,
        fallback: Box<dyn Transport>,
    ) -> Self {
        Self {
            endpoint,
            primary,
            fallback,
        }
    }

    /// Direct request first, callback-style request second.
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        let registry = CallbackRegistry::new();
        Self::new(
            config.endpoint.clone(),
            Box::new(DirectTransport::new(client.clone())),
            Box::new(CallbackTransport::new(
                client,
                registry,
                config.callback_timeout,
            )),
        )
    }

    pub async fn load_companies(&self) -> Result<Vec<Record>> {
        let endpoint = self.endpoint.as_deref().ok_or(DirectoryError::Configuration)?;

        let envelope = match self.primary.fetch(endpoint).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(
                    "{} transport failed ({}), trying {}",
                    self.primary.name(),
                    e,
                    self.fallback.name()
                );
                self.fallback.fetch(endpoint).await.map_err(|e| {
                    tracing::error!("{} transport failed: {}", self.fallback.name(), e);
                    e
                })?
            }
        };

        let records = records_from_envelope(&envelope);
        tracing::info!("Loaded {} companies", records.len());
        Ok(records)
    }
}

/// Rows to records, with legacy categories mapped to canonical ones.
pub fn records_from_envelope(envelope: &ListingEnvelope) -> Vec<Record> {
    envelope
        .rows()
        .into_iter()
        .map(|row| {
            let category = canonical_category(&row.category);
            let style_class = match row.style_class.trim() {
                "" => style_class_for(&category).to_string(),
                class => class.to_string(),
            };

            Record {
                name: row.name,
                message: row.message,
                category,
                url: row.url,
                style_class,
            }
        })
        .collect()
}
