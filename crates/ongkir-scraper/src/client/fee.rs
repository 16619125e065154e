//! Quote page fetch for one origin/destination/weight.

use crate::error::{FetchError, ScraperError};
use crate::parse::{parse_fee_page, FeePage};
use crate::source::FeeFetcher;

use super::CarrierClient;

impl CarrierClient {
    /// Fetches and parses the quote page for one route.
    ///
    /// The request is made while holding a permit from the shared
    /// politeness gate, after its randomized delay.
    ///
    /// # Errors
    ///
    /// - [`FetchError::FetchFailed`]: transport failure, non-2xx status or a
    ///   document that is not a quote page.
    /// - [`FetchError::LabelsNotFound`]: the page shell was recognized but the
    ///   origin or destination label is missing.
    pub async fn fetch_fee_page(
        &self,
        origin_code: &str,
        destination_code: &str,
        weight: u32,
    ) -> Result<FeePage, FetchError> {
        let url = self.fee_url(origin_code, destination_code, weight)?;

        let body = {
            let _permit = self.gate.enter().await?;
            tracing::debug!(%url, "fetching quote page");

            let response = self
                .client
                .get(&url)
                .header(
                    reqwest::header::ACCEPT,
                    "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                )
                .send()
                .await
                .map_err(ScraperError::from)?;
            let status = response.status();

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url,
                }
                .into());
            }

            response.text().await.map_err(ScraperError::from)?
        };

        let page = parse_fee_page(&body)
            .ok_or_else(|| ScraperError::UnrecognizedPage { url: url.clone() })?;

        if !page.has_labels() {
            return Err(FetchError::LabelsNotFound { url });
        }

        Ok(page)
    }
}

impl FeeFetcher for CarrierClient {
    async fn fetch_fee(
        &self,
        origin_code: &str,
        destination_code: &str,
        weight: u32,
    ) -> Result<FeePage, FetchError> {
        self.fetch_fee_page(origin_code, destination_code, weight)
            .await
    }
}
