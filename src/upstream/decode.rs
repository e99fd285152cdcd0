//! JSON response decoding shared by every upstream call.
//!
//! The response is taken by value, so its body is released exactly once on
//! every exit path.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::UpstreamError;
use crate::metrics;

use super::Provider;

/// Validate the status and decode the full body as `T`.
///
/// Anything other than exactly `200` is an [`UpstreamError::Status`] carrying
/// the raw status line.
pub async fn decode_json<T: DeserializeOwned>(
    provider: Provider,
    response: reqwest::Response,
) -> Result<T, UpstreamError> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(fail(
            provider,
            UpstreamError::Status {
                provider,
                status: status.to_string(),
            },
        ));
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| fail(provider, UpstreamError::Network { provider, source }))?;

    serde_json::from_slice(&body)
        .map_err(|source| fail(provider, UpstreamError::Decode { provider, source }))
}

/// Decode a response into a generic keyed map, optionally dropping `omit_key`.
pub async fn decode_map(
    provider: Provider,
    response: reqwest::Response,
    omit_key: Option<&str>,
) -> Result<Map<String, Value>, UpstreamError> {
    let mut map: Map<String, Value> = decode_json(provider, response).await?;

    if let Some(key) = omit_key.filter(|k| !k.is_empty()) {
        map.remove(key);
    }

    Ok(map)
}

/// Convert a decoded map into an explicit per-endpoint type.
pub fn decode_as<T: DeserializeOwned>(
    provider: Provider,
    map: Map<String, Value>,
) -> Result<T, UpstreamError> {
    serde_json::from_value(Value::Object(map)).map_err(|e| {
        fail(
            provider,
            UpstreamError::TypeMismatch {
                provider,
                reason: e.to_string(),
            },
        )
    })
}

/// Unwrap a field that an upstream payload must carry.
pub fn require<T>(provider: Provider, value: Option<T>, field: &str) -> Result<T, UpstreamError> {
    value.ok_or_else(|| fail(provider, UpstreamError::missing(provider, field)))
}

/// Reject a present value that cannot be used as-is.
pub fn mismatch(provider: Provider, reason: impl Into<String>) -> UpstreamError {
    fail(
        provider,
        UpstreamError::TypeMismatch {
            provider,
            reason: reason.into(),
        },
    )
}

fn fail(provider: Provider, err: UpstreamError) -> UpstreamError {
    metrics::record_upstream_failure(provider, &err);
    err
}
