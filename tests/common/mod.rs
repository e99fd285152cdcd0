//! Stub upstream providers for end-to-end tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;

use axum::body::{to_bytes, Body};
use axum::extract::{Path, Query};
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use covidcase::api::{create_router, AppState};
use covidcase::config::Config;
use covidcase::policy::PolicyClient;

/// Serve `router` on an ephemeral local port.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Config pointing every provider at the stub.
pub fn config_for(addr: SocketAddr) -> Config {
    Config {
        cases_api_url: format!("http://{addr}/cases/v1"),
        policy_api_url: format!("http://{addr}/policy/api"),
        countries_api_url: format!("http://{addr}/countries/v2"),
        http_timeout_ms: Some(5000),
        ..Config::with_port(8080)
    }
}

/// Policy client wired to the given stub.
pub fn policy_client_for(addr: SocketAddr) -> PolicyClient {
    PolicyClient::new(reqwest::Client::new(), &config_for(addr)).unwrap()
}

/// Service router wired to the given stub.
pub fn app_for(addr: SocketAddr) -> Router {
    let state = AppState::from_config(&config_for(addr), Instant::now()).unwrap();
    create_router(state)
}

/// GET through the service router; returns status and raw body.
pub async fn get_raw(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// GET through the service router and parse the body as JSON.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get_raw(app, uri).await;
    let value = serde_json::from_str(&body)
        .unwrap_or_else(|e| panic!("body is not JSON ({e}): {body}"));
    (status, value)
}

/// Providers that know exactly one country, "Norway" / NOR. Names are
/// matched case-sensitively like the real case provider.
pub fn healthy_providers() -> Router {
    Router::new()
        .route("/cases/v1/cases", get(cases))
        .route("/cases/v1/history", get(history))
        .route("/countries/v2/name/:name", get(country_lookup))
        .route("/policy/api/", get(|| async { "OxCGRT" }))
        .route(
            "/policy/api/v2/stringency/actions/:alpha3/:date",
            get(latest_actions),
        )
        .route(
            "/policy/api/v2/stringency/date-range/:start/:end",
            get(date_range),
        )
}

/// Providers that answer every request with 503.
pub fn failing_providers() -> Router {
    Router::new().fallback(|| async {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "upstream maintenance window, ref #4471",
        )
    })
}

async fn cases(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    if query.get("country").map(String::as_str) != Some("Norway") {
        return Json(json!({}));
    }
    Json(json!({
        "All": {
            "confirmed": 500,
            "recovered": 120,
            "deaths": 2,
            "country": "Norway",
            "population": 100000,
            "sq_km_area": 323802,
            "continent": "Europe",
            "capital_city": "Oslo"
        }
    }))
}

async fn history(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let known = query.get("country").map(String::as_str) == Some("Norway")
        && query.get("status").map(String::as_str) == Some("Confirmed");
    if !known {
        return Json(json!({}));
    }
    Json(json!({
        "All": {
            "country": "Norway",
            "population": 100000,
            "continent": "Europe",
            "dates": {
                "2020-03-03": 56,
                "2020-03-02": 33,
                "2020-03-01": 25
            }
        }
    }))
}

async fn country_lookup(Path(name): Path<String>) -> impl IntoResponse {
    match name.as_str() {
        "Norway" => (
            StatusCode::OK,
            Json(json!([{"name": "Norway", "alpha3Code": "NOR", "region": "Europe"}])),
        ),
        // Matched, but with an empty result list.
        "Nowhere" => (StatusCode::OK, Json(json!([]))),
        // A record without its code.
        "Erewhon" => (
            StatusCode::OK,
            Json(json!([{"name": "Erewhon", "region": "Oceania"}])),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"status": 404, "message": "Not Found"})),
        ),
    }
}

async fn latest_actions(Path((alpha3, date)): Path<(String, String)>) -> Json<Value> {
    if alpha3 != "NOR" {
        return Json(json!({"stringencyData": {"msg": "Data unavailable"}}));
    }
    Json(json!({
        "policyActions": [],
        "stringencyData": {
            "date_value": date,
            "country_code": "NOR",
            "stringency": 42.0
        }
    }))
}

async fn date_range(Path((start, end)): Path<(String, String)>) -> Json<Value> {
    Json(json!({
        "scale": {"2020-03-01": {"min": 0, "max": 100}},
        "countries": {"NOR": 1, "SWE": 2},
        "data": {
            start: {"NOR": {"stringency_actual": 10.0, "stringency": 11.0}},
            end: {"NOR": {"stringency_actual": 25.0, "stringency": 26.0}}
        }
    }))
}
