//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, send};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = send(&app, Method::GET, "/health", None, None, &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = send(&app, Method::GET, "/this-route-does-not-exist", None, None, &[]).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = send(&app, Method::GET, "/health", None, None, &[]).await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36, "x-request-id should be a UUID");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_allows_expected_version_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = send(
        &app,
        Method::OPTIONS,
        "/api/v1/recommendations/1",
        None,
        None,
        &[
            ("origin", "http://localhost:5173"),
            ("access-control-request-method", "PATCH"),
            ("access-control-request-headers", "x-expected-version"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    let allowed = headers
        .get("access-control-allow-headers")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(allowed.contains("x-expected-version"), "got {allowed}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn api_routes_require_a_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = send(&app, Method::GET, "/api/v1/recommendations", None, None, &[]).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");

    let response = send(
        &app,
        Method::GET,
        "/api/v1/recommendations",
        Some("not-a-jwt"),
        None,
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
