use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use super::domain::MatchRequest;
use super::service::MatchService;

/// Router builder exposing the eligibility match endpoint.
pub fn match_router(service: Arc<MatchService>) -> Router {
    Router::new()
        .route("/api/v1/subsidies/match", post(match_handler))
        .with_state(service)
}

pub(crate) async fn match_handler(
    State(service): State<Arc<MatchService>>,
    axum::Json(request): axum::Json<MatchRequest>,
) -> Response {
    let response = service.evaluate(&request);
    (StatusCode::OK, axum::Json(response)).into_response()
}
