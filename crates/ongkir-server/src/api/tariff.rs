use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use ongkir_core::{DataEntry, TariffQuote};
use ongkir_scraper::{FeeFetcher, LocationResolver, PageRequest, TariffQuery};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_lookup_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Raw query string. Everything is optional text so validation (and its
/// messages) stays in one place.
#[derive(Debug, Default, Deserialize)]
pub(super) struct TariffParams {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub weight: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// Unparseable query strings get the same envelope as any other invalid input.
fn accept_params(
    request_id: &str,
    params: Result<Query<TariffParams>, QueryRejection>,
) -> Result<TariffParams, ApiError> {
    params.map(|Query(p)| p).map_err(|rejection| {
        tracing::warn!(%request_id, error = %rejection, "rejected tariff query string");
        ApiError::new(request_id, "invalid_input", rejection.body_text())
    })
}

impl TariffParams {
    fn query(&self) -> Result<TariffQuery, ongkir_scraper::LookupError> {
        TariffQuery::parse(
            self.origin.as_deref(),
            self.destination.as_deref(),
            self.weight.as_deref(),
        )
    }
}

pub(super) async fn check_tariff<R, F>(
    State(state): State<AppState<R, F>>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<TariffParams>, QueryRejection>,
) -> Result<Json<ApiResponse<TariffQuote>>, ApiError>
where
    R: LocationResolver + 'static,
    F: FeeFetcher + 'static,
{
    let params = accept_params(&req_id.0, params)?;
    let query = params
        .query()
        .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;

    let quote = state
        .lookup
        .check_tariff(&query)
        .await
        .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        message: "OK",
        data: quote,
        pagination: None,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn check_tariff_recursive<R, F>(
    State(state): State<AppState<R, F>>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<TariffParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<DataEntry>>>, ApiError>
where
    R: LocationResolver + 'static,
    F: FeeFetcher + 'static,
{
    let params = accept_params(&req_id.0, params)?;
    let query = params
        .query()
        .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;
    let page = PageRequest::from_query(params.page.as_deref(), params.per_page.as_deref());

    let result = state
        .lookup
        .check_tariff_recursive(&query, page)
        .await
        .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        message: "Success",
        data: result.data,
        pagination: Some(result.pagination),
        meta: ResponseMeta::new(req_id.0),
    }))
}
