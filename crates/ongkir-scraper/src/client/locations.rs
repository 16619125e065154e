//! Location lookup against the carrier's `api-origin` / `api-destination` endpoints.

use ongkir_core::{Location, LocationKind};
use serde::Deserialize;

use crate::error::ScraperError;
use crate::source::LocationResolver;

use super::CarrierClient;

/// Body of a lookup response: `{"status": true, "data": [{"code", "label"}]}`.
///
/// `status: false`, a missing `status`, or a missing/null `data` all mean
/// "no match" rather than a failure.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    status: bool,
    #[serde(default)]
    data: Option<Vec<Location>>,
}

impl CarrierClient {
    /// Resolves a free-text query into candidate locations.
    ///
    /// No retries are attempted.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`]: network or TLS failure.
    /// - [`ScraperError::UnexpectedStatus`]: any non-2xx status.
    /// - [`ScraperError::Deserialize`]: body is not the expected JSON shape.
    pub async fn resolve_locations(
        &self,
        kind: LocationKind,
        query: &str,
    ) -> Result<Vec<Location>, ScraperError> {
        let url = self.lookup_url(kind, query)?;

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<LookupResponse>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("{kind} lookup for \"{query}\""),
                source: e,
            }
        })?;

        if !parsed.status {
            tracing::debug!(%kind, query, "lookup service reported no match");
            return Ok(Vec::new());
        }

        let candidates = parsed.data.unwrap_or_default();
        tracing::debug!(%kind, query, candidates = candidates.len(), "resolved locations");
        Ok(candidates)
    }
}

impl LocationResolver for CarrierClient {
    async fn resolve(
        &self,
        kind: LocationKind,
        query: &str,
    ) -> Result<Vec<Location>, ScraperError> {
        self.resolve_locations(kind, query).await
    }
}
