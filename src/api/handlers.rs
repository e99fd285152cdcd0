//! HTTP API handlers.

use std::time::Instant;

use axum::{
    extract::{Path, Query, State},
    http::{header::HOST, HeaderMap},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cases::{CaseClient, CaseInfo};
use crate::config::Config;
use crate::error::ApiError;
use crate::metrics;
use crate::policy::{PolicyClient, StringencyInfo};
use crate::upstream;
use crate::utils::format_uptime;

use super::params::{country_from_path, first_param, parse_limit, parse_scope, QueryPairs};

/// API version reported by `/diag`.
pub const API_VERSION: &str = "v1";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Case-statistics client.
    pub cases: CaseClient,
    /// Policy-stringency client.
    pub policy: PolicyClient,
    /// Process start, fixed at construction.
    started_at: Instant,
}

impl AppState {
    /// Create new app state.
    pub fn new(cases: CaseClient, policy: PolicyClient, started_at: Instant) -> Self {
        Self {
            cases,
            policy,
            started_at,
        }
    }

    /// Build both clients over one shared HTTP client.
    pub fn from_config(config: &Config, started_at: Instant) -> crate::Result<Self> {
        let http = upstream::build_http_client(config)?;
        Ok(Self::new(
            CaseClient::new(http.clone(), config)?,
            PolicyClient::new(http, config)?,
            started_at,
        ))
    }

    /// Probe both providers. Probe failures are logged and reported as empty
    /// status strings.
    pub async fn diagnose(&self) -> Diagnose {
        let covidtrackerapi = self.policy.health_check().await.unwrap_or_else(|e| {
            warn!(error = %e, "policy provider health check failed");
            String::new()
        });
        let mmediagroupapi = self.cases.health_check().await.unwrap_or_else(|e| {
            warn!(error = %e, "case provider health check failed");
            String::new()
        });

        Diagnose {
            mmediagroupapi,
            covidtrackerapi,
            // No webhook registry exists yet.
            registered: 0,
            version: API_VERSION.to_string(),
            uptime: format_uptime(self.started_at.elapsed()),
        }
    }
}

/// Diagnostic report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnose {
    /// Case provider status line, empty if unreachable.
    pub mmediagroupapi: String,
    /// Policy provider status line, empty if unreachable.
    pub covidtrackerapi: String,
    /// Registered webhooks.
    pub registered: u64,
    /// API version.
    pub version: String,
    /// Time since start, e.g. `1h2m3.5s`.
    pub uptime: String,
}

/// Case figures for one country.
pub async fn country(
    State(state): State<AppState>,
    Path(rest): Path<String>,
    Query(query): Query<QueryPairs>,
) -> Result<Json<CaseInfo>, ApiError> {
    metrics::record_api_request("country");
    let country = country_from_path(&rest)?;
    let scope = parse_scope(first_param(&query, "scope"));

    let info = state.cases.resolve_cases(&country, &scope).await?;
    Ok(Json(info))
}

/// Stringency figures for one country.
pub async fn policy(
    State(state): State<AppState>,
    Path(rest): Path<String>,
    Query(query): Query<QueryPairs>,
) -> Result<Json<StringencyInfo>, ApiError> {
    metrics::record_api_request("policy");
    let country = country_from_path(&rest)?;
    let scope = parse_scope(first_param(&query, "scope"));

    let info = state.policy.resolve_policy(&country, &scope).await?;
    Ok(Json(info))
}

/// Provider health, version and uptime. Always 200.
pub async fn diag(State(state): State<AppState>) -> Json<Diagnose> {
    metrics::record_api_request("diag");
    Json(state.diagnose().await)
}

/// Webhook listing. There is no webhook registry.
pub async fn list_notifications(Query(query): Query<QueryPairs>) -> ApiError {
    metrics::record_api_request("notifications");
    debug!(limit = parse_limit(first_param(&query, "limit")), "webhook listing requested");
    ApiError::NotImplemented
}

/// Webhook lookup or removal. There is no webhook registry.
pub async fn notification(Path(id): Path<String>) -> ApiError {
    metrics::record_api_request("notifications");
    debug!(%id, "webhook requested");
    ApiError::NotImplemented
}

/// Methods a route declares but does not support.
pub async fn not_implemented() -> ApiError {
    ApiError::NotImplemented
}

/// Help page for any path the API does not know.
pub async fn lost_user(headers: HeaderMap) -> Html<String> {
    let host: String = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '-' | '[' | ']'))
        .collect();

    let base = format!("http://{host}");
    let links: String = [
        "/corona/v1/country/norway?scope=2020-12-01-2021-01-31",
        "/corona/v1/policy/norway?scope=2020-12-01-2021-01-31",
        "/diag",
    ]
    .iter()
    .map(|path| format!("<p><a href=\"{base}{path}\">{base}{path}</a></p>\n"))
    .collect();

    Html(format!(
        "<p>Hello! You seem lost! Let me help you!</p>\n<p>These are some examples:</p>\n{links}"
    ))
}
