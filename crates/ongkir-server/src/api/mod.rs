mod tariff;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use ongkir_core::Pagination;
use ongkir_scraper::{FeeFetcher, FetchError, LocationResolver, LookupError, TariffLookup};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

pub struct AppState<R, F> {
    pub lookup: Arc<TariffLookup<R, F>>,
}

impl<R, F> Clone for AppState<R, F> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: &'static str,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "invalid_input" | "no_candidates" | "labels_not_found" => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            "resolution_failed" | "fetch_failed" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a request-level lookup failure onto the error envelope.
pub(super) fn map_lookup_error(request_id: String, error: &LookupError) -> ApiError {
    match error {
        LookupError::InvalidInput(message) => {
            tracing::warn!(%request_id, %message, "rejected tariff request");
            ApiError::new(request_id, "invalid_input", *message)
        }
        LookupError::ResolutionFailed { kind, source } => {
            tracing::error!(%request_id, %kind, error = %source, "location lookup failed");
            ApiError::new(
                request_id,
                "resolution_failed",
                format!("Error fetching {kind} code"),
            )
        }
        LookupError::NoCandidates { .. } => {
            tracing::warn!(%request_id, error = %error, "lookup matched nothing");
            ApiError::new(request_id, "no_candidates", error.to_string())
        }
        LookupError::Fetch(FetchError::LabelsNotFound { url }) => {
            tracing::warn!(%request_id, %url, "quote page had no route labels");
            ApiError::new(
                request_id,
                "labels_not_found",
                "Origin or destination not found on page",
            )
        }
        LookupError::Fetch(fetch @ FetchError::FetchFailed(_)) => {
            tracing::error!(%request_id, error = %fetch, "quote page fetch failed");
            ApiError::new(request_id, "fetch_failed", "Error scraping data")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app<R, F>(state: AppState<R, F>) -> Router
where
    R: LocationResolver + 'static,
    F: FeeFetcher + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/check-tariff", get(tariff::check_tariff::<R, F>))
        .route(
            "/check-tariff/recursive",
            get(tariff::check_tariff_recursive::<R, F>),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        message: "OK",
        data: HealthData { status: "ok" },
        pagination: None,
        meta: ResponseMeta::new(req_id.0),
    })
}
