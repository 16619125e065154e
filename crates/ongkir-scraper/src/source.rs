//! Seams between the lookup engine and the carrier site.
//!
//! [`crate::CarrierClient`] implements both traits against the live site;
//! tests substitute in-memory stubs.

use std::future::Future;

use ongkir_core::{Location, LocationKind};

use crate::error::{FetchError, ScraperError};
use crate::parse::FeePage;

/// Turns a free-text query into candidate locations.
pub trait LocationResolver: Send + Sync {
    /// Candidates in the order the lookup service returned them.
    ///
    /// An empty list means the service answered but matched nothing.
    fn resolve(
        &self,
        kind: LocationKind,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Location>, ScraperError>> + Send;
}

/// Fetches and parses the quote page for one origin/destination/weight.
pub trait FeeFetcher: Send + Sync {
    fn fetch_fee(
        &self,
        origin_code: &str,
        destination_code: &str,
        weight: u32,
    ) -> impl Future<Output = Result<FeePage, FetchError>> + Send;
}
