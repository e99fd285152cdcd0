//! Upstream provider plumbing.
//!
//! This module handles:
//! - Provider identity (used in errors, logs and metrics)
//! - Outbound GET with latency/failure accounting
//! - JSON response decoding with status validation

pub mod decode;

use std::time::{Duration, Instant};

use strum::{Display, IntoStaticStr};
use tracing::debug;
use url::Url;

use crate::config::{parse_base_url, Config};
use crate::error::{self, ServiceError, UpstreamError};
use crate::metrics;

pub use decode::{decode_as, decode_json, decode_map, mismatch, require};

/// External services the aggregator depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum Provider {
    /// Case-statistics provider.
    #[strum(serialize = "mmediagroupapi")]
    Cases,
    /// Policy-stringency provider.
    #[strum(serialize = "covidtrackerapi")]
    Policy,
    /// Country metadata provider (alpha-3 lookup).
    #[strum(serialize = "restcountries")]
    Countries,
}

impl Provider {
    /// Static label for metrics.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Build the shared outbound HTTP client.
pub fn build_http_client(config: &Config) -> error::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        // Keep connections alive for reuse
        .tcp_keepalive(Duration::from_secs(30))
        .pool_idle_timeout(Duration::from_secs(90));

    if let Some(timeout_ms) = config.http_timeout_ms {
        builder = builder.timeout(Duration::from_millis(timeout_ms));
    }

    Ok(builder.build()?)
}

/// Parse a configured base URL, reporting which setting was wrong.
pub(crate) fn base_url(name: &str, value: &str) -> error::Result<Url> {
    parse_base_url(value).map_err(|reason| ServiceError::InvalidConfig(format!("{name} {reason}")))
}

/// Append path segments to a base URL.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // Bases are validated by `base_url`, so segments can always be pushed.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Issue a GET and account for it. Only transport failures are errors here;
/// status handling is left to the decoder.
pub async fn fetch(
    http: &reqwest::Client,
    provider: Provider,
    url: Url,
) -> Result<reqwest::Response, UpstreamError> {
    debug!(%provider, %url, "calling upstream");
    let start = Instant::now();

    let result = http.get(url).send().await;
    metrics::record_upstream_latency(provider, start);

    result.map_err(|source| {
        let err = UpstreamError::Network { provider, source };
        metrics::record_upstream_failure(provider, &err);
        err
    })
}

/// Probe a provider and report its status line, e.g. "200 OK".
pub async fn health_check(
    http: &reqwest::Client,
    provider: Provider,
    url: Url,
) -> Result<String, UpstreamError> {
    let response = fetch(http, provider, url).await?;
    Ok(response.status().to_string())
}
