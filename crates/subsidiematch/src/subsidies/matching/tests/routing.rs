use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use super::common::{request, rule};
use crate::subsidies::matching::router::match_router;
use crate::subsidies::matching::service::MatchService;

#[tokio::test]
async fn match_endpoint_returns_ranked_matches() {
    let service = Arc::new(MatchService::new(vec![rule()]));
    let app = match_router(service);

    let body = serde_json::to_vec(&request()).expect("request serializes");
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/subsidies/match")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let payload: Value = serde_json::from_slice(&bytes).expect("body parses");

    assert_eq!(payload["total_matches"], 1);
    assert_eq!(payload["matches"][0]["eligible"], true);
    assert_eq!(payload["matches"][0]["match_score"]["score"], 100.0);
    assert!(payload["analysis_timestamp"].is_string());
}

#[tokio::test]
async fn malformed_request_is_rejected() {
    let service = Arc::new(MatchService::new(vec![rule()]));
    let app = match_router(service);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/subsidies/match")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"company\":{}}"))
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
