use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use subsidiematch::subsidies::matching::{match_router, MatchService};

use crate::infra::{split_keywords, AppState};

pub(crate) fn with_subsidy_routes(service: Arc<MatchService>) -> axum::Router {
    match_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/subsidies/eia",
            axum::routing::get(eia_search_endpoint),
        )
        .route(
            "/api/v1/subsidies/eia/:code",
            axum::routing::get(eia_detail_endpoint),
        )
        .route(
            "/api/v1/subsidies/isde/brand/:brand",
            axum::routing::get(isde_brand_endpoint),
        )
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> Json<serde_json::Value> {
    let store = &state.store;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "database_loaded": store.is_loaded(),
        "database_stats": store.stats(),
        "families": store.load_report().families,
        "integrity_warnings": store.integrity_warnings().len(),
    }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct EiaSearchParams {
    #[serde(default)]
    keywords: String,
    #[serde(default = "default_min_matches")]
    min_matches: usize,
}

fn default_min_matches() -> usize {
    1
}

pub(crate) async fn eia_search_endpoint(
    Extension(state): Extension<AppState>,
    Query(params): Query<EiaSearchParams>,
) -> impl IntoResponse {
    let keywords = split_keywords(&params.keywords);
    let results = state
        .store
        .search_eia_by_keywords(&keywords, params.min_matches);
    Json(json!({
        "results": results,
        "total": results.len(),
    }))
}

pub(crate) async fn eia_detail_endpoint(
    Extension(state): Extension<AppState>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    match state.store.eia_by_code(&code) {
        Some(found) => (StatusCode::OK, Json(json!(found))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown EIA code '{code}'") })),
        ),
    }
}

pub(crate) async fn isde_brand_endpoint(
    Extension(state): Extension<AppState>,
    Path(brand): Path<String>,
) -> impl IntoResponse {
    let results = state.store.search_isde_by_brand(&brand);
    Json(json!({
        "results": results,
        "total": results.len(),
    }))
}
