//! HTTP API route definitions.

use std::time::Duration;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LINK},
        HeaderName, HeaderValue, Method,
    },
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    country, diag, list_notifications, lost_user, not_implemented, notification, policy, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Resolver endpoints; the remainder is validated by the handler so a
        // bad shape is a 400 rather than a fallback page.
        .route(
            "/corona/v1/country/*name",
            get(country)
                .post(not_implemented)
                .put(not_implemented)
                .delete(not_implemented),
        )
        .route(
            "/corona/v1/policy/*name",
            get(policy)
                .post(not_implemented)
                .put(not_implemented)
                .delete(not_implemented),
        )
        // Webhooks are declared but unimplemented
        .route(
            "/corona/v1/notifications/",
            get(list_notifications).post(not_implemented),
        )
        .route(
            "/corona/v1/notifications/:id",
            get(notification).delete(notification),
        )
        .route(
            "/diag",
            get(diag)
                .post(not_implemented)
                .put(not_implemented)
                .delete(not_implemented),
        )
        .fallback(lost_user)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Any http(s) origin may call the API without credentials.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            let origin = origin.as_bytes();
            origin.starts_with(b"https://") || origin.starts_with(b"http://")
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            ACCEPT,
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers([LINK])
        .allow_credentials(false)
        .max_age(Duration::from_secs(300))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::time::Instant;
    use tower::ServiceExt;

    use crate::api::handlers::Diagnose;

    /// State whose providers refuse connections.
    fn offline_state() -> AppState {
        let config = Config {
            cases_api_url: "http://127.0.0.1:9/v1".to_string(),
            policy_api_url: "http://127.0.0.1:9/api".to_string(),
            countries_api_url: "http://127.0.0.1:9/v2".to_string(),
            http_timeout_ms: Some(2000),
            ..Config::with_port(8080)
        };
        AppState::from_config(&config, Instant::now()).unwrap()
    }

    async fn send(method: Method, uri: &str) -> (StatusCode, String) {
        let app = create_router(offline_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn diag_degrades_when_providers_are_down() {
        let (status, body) = send(Method::GET, "/diag").await;

        assert_eq!(status, StatusCode::OK);
        let diag: Diagnose = serde_json::from_str(&body).unwrap();
        assert_eq!(diag.mmediagroupapi, "");
        assert_eq!(diag.covidtrackerapi, "");
        assert_eq!(diag.registered, 0);
        assert_eq!(diag.version, "v1");
        assert!(diag.uptime.ends_with('s'));
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_generic_500() {
        let (status, body) = send(Method::GET, "/corona/v1/country/norway").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, crate::error::UPSTREAM_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn extra_path_segment_is_a_400() {
        let (status, body) = send(Method::GET, "/corona/v1/country/norway/oslo").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Malformed URL");
    }

    #[tokio::test]
    async fn non_alphabetic_name_is_a_400() {
        let (status, _) = send(Method::GET, "/corona/v1/policy/n0rway").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn repeated_query_parameters_are_not_rejected() {
        // The request gets past parameter parsing and fails upstream.
        let (status, body) = send(
            Method::GET,
            "/corona/v1/country/norway?scope=2020-03-01-2020-03-03&scope=x",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, crate::error::UPSTREAM_FAILURE_MESSAGE);

        let (status, _) = send(Method::GET, "/corona/v1/notifications/?limit=5&limit=6").await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn unsupported_methods_are_501() {
        let (status, _) = send(Method::POST, "/corona/v1/country/norway").await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

        let (status, _) = send(Method::DELETE, "/diag").await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn notifications_are_not_implemented() {
        let (status, _) = send(Method::GET, "/corona/v1/notifications/?limit=abc").await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

        let (status, _) = send(Method::DELETE, "/corona/v1/notifications/42").await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn unknown_path_gets_help_page() {
        let (status, body) = send(Method::GET, "/exchange/v1/whatever").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("You seem lost"));
    }
}
