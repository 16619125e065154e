//! HTTP client for the carrier's public location lookup and quote pages.

mod fee;
mod locations;

use std::time::Duration;

use ongkir_core::{AppConfig, LocationKind};
use reqwest::Client;

use crate::error::ScraperError;
use crate::politeness::PolitenessGate;

/// HTTP client for the carrier site.
///
/// Location lookups go straight to the JSON endpoints. Quote page fetches
/// pass through the shared [`PolitenessGate`]; cloning the gate into several
/// clients keeps a single process-wide budget.
pub struct CarrierClient {
    pub(super) client: Client,
    pub(super) base_url: String,
    pub(super) gate: PolitenessGate,
}

impl CarrierClient {
    /// Creates a `CarrierClient` with configured timeout and `User-Agent`.
    ///
    /// `timeout_secs` bounds every individual request, which makes it the
    /// per-fetch timeout of the fan-out path.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `base_url` does not parse, or
    /// [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        gate: PolitenessGate,
    ) -> Result<Self, ScraperError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            gate,
        })
    }

    /// Builds a client and a fresh gate from application config.
    ///
    /// # Errors
    ///
    /// See [`CarrierClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let gate = PolitenessGate::new(config.max_concurrent_fetches, config.fetch_delay_max_ms);
        Self::new(
            &config.carrier_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            gate,
        )
    }

    #[must_use]
    pub fn gate(&self) -> &PolitenessGate {
        &self.gate
    }

    /// `<base>/api-origin?search=<query>` or `<base>/api-destination?search=<query>`.
    fn lookup_url(&self, kind: LocationKind, query: &str) -> Result<String, ScraperError> {
        let endpoint = match kind {
            LocationKind::Origin => "api-origin",
            LocationKind::Destination => "api-destination",
        };
        let mut url = self.endpoint(endpoint)?;
        url.query_pairs_mut().append_pair("search", query);
        Ok(url.to_string())
    }

    /// `<base>/shipping-fee?origin=<o>&destination=<d>&weight=<w>`.
    fn fee_url(
        &self,
        origin_code: &str,
        destination_code: &str,
        weight: u32,
    ) -> Result<String, ScraperError> {
        let mut url = self.endpoint("shipping-fee")?;
        url.query_pairs_mut()
            .append_pair("origin", origin_code)
            .append_pair("destination", destination_code)
            .append_pair("weight", &weight.to_string());
        Ok(url.to_string())
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ScraperError> {
        let raw = format!("{}/{path}", self.base_url);
        reqwest::Url::parse(&raw).map_err(|e| ScraperError::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }
}
