//! Tariff command handlers.
//!
//! Both commands print the same JSON payload the server puts under `data`
//! (plus `pagination` for the recursive path) to stdout. Logs go to stderr.

use std::sync::Arc;
use std::time::Duration;

use ongkir_core::AppConfig;
use ongkir_scraper::{CarrierClient, PageRequest, TariffLookup, TariffQuery};

use crate::RouteArgs;

fn build_lookup(config: &AppConfig) -> anyhow::Result<TariffLookup<CarrierClient, CarrierClient>> {
    let client = Arc::new(
        CarrierClient::from_config(config)
            .map_err(|e| anyhow::anyhow!("failed to build carrier client: {e}"))?,
    );
    Ok(TariffLookup::new(
        Arc::clone(&client),
        client,
        Duration::from_secs(config.aggregate_deadline_secs),
    ))
}

pub(crate) fn parse_route(route: &RouteArgs) -> anyhow::Result<TariffQuery> {
    Ok(TariffQuery::parse(
        Some(route.origin.as_str()),
        Some(route.destination.as_str()),
        Some(route.weight.as_str()),
    )?)
}

/// Single-pair lookup.
///
/// # Errors
///
/// Returns an error on invalid input or on any request-level lookup failure.
pub(crate) async fn run_check(config: &AppConfig, route: &RouteArgs) -> anyhow::Result<()> {
    let query = parse_route(route)?;
    let lookup = build_lookup(config)?;

    let quote = lookup.check_tariff(&query).await?;
    tracing::info!(
        origin = %quote.info.origin.code,
        destination = %quote.info.destination.code,
        services = quote.tariff.len(),
        "tariff lookup complete"
    );
    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}

/// Paginated fan-out lookup. Combinations that fail are dropped and logged,
/// followed by a summary event.
///
/// # Errors
///
/// Returns an error on invalid input, on location lookup failure, or when a
/// side has no candidates.
pub(crate) async fn run_recursive(
    config: &AppConfig,
    route: &RouteArgs,
    page: Option<&str>,
    per_page: Option<&str>,
) -> anyhow::Result<()> {
    let query = parse_route(route)?;
    let request = PageRequest::from_query(page, per_page);
    let lookup = build_lookup(config)?;

    let result = lookup.check_tariff_recursive(&query, request).await?;
    tracing::info!(
        quoted = result.data.len(),
        page = result.pagination.page,
        total_pages = result.pagination.total_pages,
        total_items = result.pagination.total_items,
        "recursive lookup complete"
    );
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
