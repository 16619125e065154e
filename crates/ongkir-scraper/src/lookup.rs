//! Request-level orchestration: validate → resolve → paginate → fan out → assemble.
//!
//! Request-level failures ([`LookupError::InvalidInput`],
//! [`LookupError::ResolutionFailed`], [`LookupError::NoCandidates`]) stop the
//! request before any fee fetch. On the recursive path per-combination
//! failures never surface here; they only shrink `data`.

use std::sync::Arc;
use std::time::Duration;

use ongkir_core::{DataEntry, Location, LocationKind, Pagination, TariffInfo, TariffQuote};
use serde::Serialize;
use thiserror::Error;

use crate::aggregate::{aggregate, AggregateOutcome};
use crate::error::{FetchError, ScraperError};
use crate::pagination::{generate_page, PageRequest};
use crate::source::{FeeFetcher, LocationResolver};

pub const MISSING_PARAMETERS: &str = "Missing parameters";
pub const INVALID_WEIGHT: &str = "Invalid weight";

#[derive(Debug, Error)]
pub enum LookupError {
    /// Caller-fixable: a required parameter is absent or malformed.
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("failed to resolve {kind} locations: {source}")]
    ResolutionFailed {
        kind: LocationKind,
        #[source]
        source: ScraperError,
    },

    #[error("There is no {kind} found")]
    NoCandidates { kind: LocationKind },

    /// Only produced by the single-pair path.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Validated origin/destination/weight triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffQuery {
    pub origin: String,
    pub destination: String,
    pub weight: u32,
}

impl TariffQuery {
    /// Validates raw query-string values.
    ///
    /// # Errors
    ///
    /// [`LookupError::InvalidInput`] when any value is absent or empty, or
    /// when `weight` is not a positive integer.
    pub fn parse(
        origin: Option<&str>,
        destination: Option<&str>,
        weight: Option<&str>,
    ) -> Result<Self, LookupError> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.is_empty())
        }

        let (Some(origin), Some(destination), Some(weight)) =
            (present(origin), present(destination), present(weight))
        else {
            return Err(LookupError::InvalidInput(MISSING_PARAMETERS));
        };

        let weight = parse_weight(weight).ok_or(LookupError::InvalidInput(INVALID_WEIGHT))?;

        Ok(Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            weight,
        })
    }
}

/// Positive integer weight, or `None`.
#[must_use]
pub fn parse_weight(raw: &str) -> Option<u32> {
    raw.parse::<i64>()
        .ok()
        .filter(|w| *w > 0)
        .and_then(|w| u32::try_from(w).ok())
}

/// Payload of the recursive lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecursiveTariff {
    pub data: Vec<DataEntry>,
    pub pagination: Pagination,
}

impl RecursiveTariff {
    /// Pagination is taken as computed before the fan-out; dropped entries
    /// never adjust it.
    #[must_use]
    pub fn assemble(outcome: AggregateOutcome, pagination: Pagination) -> Self {
        Self {
            data: outcome.entries,
            pagination,
        }
    }
}

/// Lookup engine over a resolver and a fee fetcher.
pub struct TariffLookup<R, F> {
    resolver: Arc<R>,
    fetcher: Arc<F>,
    aggregate_deadline: Duration,
}

impl<R, F> TariffLookup<R, F>
where
    R: LocationResolver,
    F: FeeFetcher + 'static,
{
    #[must_use]
    pub fn new(resolver: Arc<R>, fetcher: Arc<F>, aggregate_deadline: Duration) -> Self {
        Self {
            resolver,
            fetcher,
            aggregate_deadline,
        }
    }

    /// Single-pair path: first candidate on each side, one fetch.
    ///
    /// # Errors
    ///
    /// Any request-level [`LookupError`], plus [`LookupError::Fetch`] when the
    /// quote page cannot be fetched or lacks labels.
    pub async fn check_tariff(&self, query: &TariffQuery) -> Result<TariffQuote, LookupError> {
        let (origins, destinations) = self.resolve_both(query).await?;
        let (Some(origin), Some(destination)) = (origins.first(), destinations.first()) else {
            return Err(no_candidates_side(&origins));
        };

        let page = self
            .fetcher
            .fetch_fee(&origin.code, &destination.code, query.weight)
            .await?;

        Ok(TariffQuote {
            info: TariffInfo {
                origin: Location::new(origin.code.clone(), page.origin_label),
                destination: Location::new(destination.code.clone(), page.destination_label),
                weight: query.weight,
            },
            tariff: page.tariff,
        })
    }

    /// Recursive path: every origin × destination pair on the requested page.
    ///
    /// # Errors
    ///
    /// Only request-level [`LookupError`]s. If resolution succeeds the call
    /// succeeds, even when every fetch fails.
    pub async fn check_tariff_recursive(
        &self,
        query: &TariffQuery,
        request: PageRequest,
    ) -> Result<RecursiveTariff, LookupError> {
        let (origins, destinations) = self.resolve_both(query).await?;
        if origins.is_empty() || destinations.is_empty() {
            return Err(no_candidates_side(&origins));
        }

        let page = generate_page(&origins, &destinations, request);
        tracing::info!(
            origins = origins.len(),
            destinations = destinations.len(),
            page = page.pagination.page,
            per_page = page.pagination.per_page,
            total_items = page.pagination.total_items,
            dispatched = page.combinations.len(),
            "dispatching fee fan-out"
        );

        let outcome = aggregate(
            Arc::clone(&self.fetcher),
            page.combinations,
            query.weight,
            self.aggregate_deadline,
        )
        .await;

        Ok(RecursiveTariff::assemble(outcome, page.pagination))
    }

    /// Resolves both sides concurrently; the origin error wins if both fail.
    async fn resolve_both(
        &self,
        query: &TariffQuery,
    ) -> Result<(Vec<Location>, Vec<Location>), LookupError> {
        let (origins, destinations) = tokio::join!(
            self.resolver.resolve(LocationKind::Origin, &query.origin),
            self.resolver
                .resolve(LocationKind::Destination, &query.destination),
        );

        let origins = origins.map_err(|source| LookupError::ResolutionFailed {
            kind: LocationKind::Origin,
            source,
        })?;
        let destinations = destinations.map_err(|source| LookupError::ResolutionFailed {
            kind: LocationKind::Destination,
            source,
        })?;

        Ok((origins, destinations))
    }
}

fn no_candidates_side(origins: &[Location]) -> LookupError {
    let kind = if origins.is_empty() {
        LocationKind::Origin
    } else {
        LocationKind::Destination
    };
    LookupError::NoCandidates { kind }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ongkir_core::TariffEntry;

    use crate::parse::FeePage;

    struct StubResolver {
        origins: Result<Vec<Location>, u16>,
        destinations: Result<Vec<Location>, u16>,
    }

    impl StubResolver {
        fn new(origins: &[&str], destinations: &[&str]) -> Self {
            Self {
                origins: Ok(locs(origins)),
                destinations: Ok(locs(destinations)),
            }
        }
    }

    impl LocationResolver for StubResolver {
        async fn resolve(
            &self,
            kind: LocationKind,
            _query: &str,
        ) -> Result<Vec<Location>, ScraperError> {
            let side = match kind {
                LocationKind::Origin => &self.origins,
                LocationKind::Destination => &self.destinations,
            };
            side.clone().map_err(|status| ScraperError::UnexpectedStatus {
                status,
                url: format!("stub://{kind}"),
            })
        }
    }

    #[derive(Default)]
    struct StubFetcher {
        calls: AtomicUsize,
        fail_origin: Option<&'static str>,
        blank_labels: bool,
    }

    impl FeeFetcher for StubFetcher {
        async fn fetch_fee(
            &self,
            origin_code: &str,
            destination_code: &str,
            _weight: u32,
        ) -> Result<FeePage, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_origin == Some(origin_code) {
                return Err(FetchError::FetchFailed(ScraperError::UnrecognizedPage {
                    url: "stub://fee".to_string(),
                }));
            }
            if self.blank_labels {
                return Err(FetchError::LabelsNotFound {
                    url: "stub://fee".to_string(),
                });
            }
            Ok(FeePage {
                origin_label: format!("{origin_code} PAGE"),
                destination_label: format!("{destination_code} PAGE"),
                tariff: vec![TariffEntry {
                    service_name: "REG".to_string(),
                    shipment_type: "Paket".to_string(),
                    fee: "Rp 9.000".to_string(),
                    etd: "2 Days".to_string(),
                }],
            })
        }
    }

    fn locs(codes: &[&str]) -> Vec<Location> {
        codes.iter().map(|c| Location::new(*c, *c)).collect()
    }

    fn engine(
        resolver: StubResolver,
        fetcher: StubFetcher,
    ) -> (TariffLookup<StubResolver, StubFetcher>, Arc<StubFetcher>) {
        let fetcher = Arc::new(fetcher);
        let lookup = TariffLookup::new(
            Arc::new(resolver),
            Arc::clone(&fetcher),
            Duration::from_secs(5),
        );
        (lookup, fetcher)
    }

    fn query(weight: u32) -> TariffQuery {
        TariffQuery {
            origin: "jakarta".to_string(),
            destination: "bandung".to_string(),
            weight,
        }
    }

    #[test]
    fn parse_accepts_valid_triple() {
        let q = TariffQuery::parse(Some("jakarta"), Some("bandung"), Some("1000")).unwrap();
        assert_eq!(q, query(1000));
    }

    #[test]
    fn parse_rejects_missing_or_empty_parameters() {
        for (o, d, w) in [
            (None, Some("b"), Some("1")),
            (Some("a"), None, Some("1")),
            (Some("a"), Some("b"), None),
            (Some(""), Some("b"), Some("1")),
        ] {
            let err = TariffQuery::parse(o, d, w).unwrap_err();
            assert!(matches!(err, LookupError::InvalidInput(MISSING_PARAMETERS)));
        }
    }

    #[test]
    fn parse_rejects_non_positive_or_non_numeric_weight() {
        for raw in ["-5", "0", "abc", "1.5", "99999999999"] {
            let err = TariffQuery::parse(Some("a"), Some("b"), Some(raw)).unwrap_err();
            assert!(
                matches!(err, LookupError::InvalidInput(INVALID_WEIGHT)),
                "weight {raw:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn recursive_two_by_two_dispatches_four() {
        let (lookup, fetcher) = engine(StubResolver::new(&["A", "B"], &["X", "Y"]), StubFetcher::default());
        let result = lookup
            .check_tariff_recursive(&query(1000), PageRequest::default())
            .await
            .unwrap();

        assert_eq!(result.pagination.total_items, 4);
        assert_eq!(result.pagination.total_pages, 1);
        assert_eq!(result.data.len(), 4);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);
        assert!(result.data.iter().all(|e| e.weight == 1000));
    }

    #[tokio::test]
    async fn recursive_partial_failure_keeps_totals() {
        let fetcher = StubFetcher {
            fail_origin: Some("A"),
            ..StubFetcher::default()
        };
        let (lookup, _) = engine(StubResolver::new(&["A", "B"], &["X", "Y"]), fetcher);
        let result = lookup
            .check_tariff_recursive(&query(1000), PageRequest::default())
            .await
            .unwrap();

        assert_eq!(result.data.len(), 2);
        assert_eq!(result.pagination.total_items, 4);
        assert!(result.data.iter().all(|e| e.origin.code == "B"));
    }

    #[tokio::test]
    async fn recursive_all_failures_still_succeeds() {
        let fetcher = StubFetcher {
            blank_labels: true,
            ..StubFetcher::default()
        };
        let (lookup, _) = engine(StubResolver::new(&["A"], &["X", "Y", "Z"]), fetcher);
        let result = lookup
            .check_tariff_recursive(&query(1), PageRequest { page: 1, per_page: 2 })
            .await
            .unwrap();

        assert!(result.data.is_empty());
        assert_eq!(result.pagination.total_items, 3);
        assert_eq!(result.pagination.total_pages, 2);
    }

    #[tokio::test]
    async fn recursive_page_window_limits_dispatch() {
        let (lookup, fetcher) = engine(StubResolver::new(&["A", "B", "C"], &["X"]), StubFetcher::default());
        let result = lookup
            .check_tariff_recursive(&query(1), PageRequest { page: 2, per_page: 2 })
            .await
            .unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0].origin.code, "C");
        assert_eq!(result.pagination.total_pages, 2);
    }

    #[tokio::test]
    async fn recursive_without_origin_candidates_is_terminal() {
        let (lookup, fetcher) = engine(StubResolver::new(&[], &["X"]), StubFetcher::default());
        let err = lookup
            .check_tariff_recursive(&query(1), PageRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NoCandidates { kind: LocationKind::Origin }));
        assert_eq!(err.to_string(), "There is no origin found");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn recursive_without_destination_candidates_is_terminal() {
        let (lookup, fetcher) = engine(StubResolver::new(&["A"], &[]), StubFetcher::default());
        let err = lookup
            .check_tariff_recursive(&query(1), PageRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LookupError::NoCandidates {
                kind: LocationKind::Destination
            }
        ));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn resolution_failure_is_terminal() {
        let resolver = StubResolver {
            origins: Ok(locs(&["A"])),
            destinations: Err(500),
        };
        let (lookup, fetcher) = engine(resolver, StubFetcher::default());
        let err = lookup
            .check_tariff_recursive(&query(1), PageRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LookupError::ResolutionFailed {
                kind: LocationKind::Destination,
                ..
            }
        ));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn single_pair_uses_first_candidates_and_page_labels() {
        let (lookup, fetcher) = engine(StubResolver::new(&["A", "B"], &["X", "Y"]), StubFetcher::default());
        let quote = lookup.check_tariff(&query(700)).await.unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(quote.info.origin, Location::new("A", "A PAGE"));
        assert_eq!(quote.info.destination, Location::new("X", "X PAGE"));
        assert_eq!(quote.info.weight, 700);
        assert_eq!(quote.tariff.len(), 1);
    }

    #[tokio::test]
    async fn single_pair_surfaces_labels_not_found() {
        let fetcher = StubFetcher {
            blank_labels: true,
            ..StubFetcher::default()
        };
        let (lookup, _) = engine(StubResolver::new(&["A"], &["X"]), fetcher);
        let err = lookup.check_tariff(&query(1)).await.unwrap_err();
        assert!(matches!(
            err,
            LookupError::Fetch(FetchError::LabelsNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn single_pair_without_destination_is_terminal() {
        let (lookup, fetcher) = engine(StubResolver::new(&["A"], &[]), StubFetcher::default());
        let err = lookup.check_tariff(&query(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "There is no destination found");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }
}
