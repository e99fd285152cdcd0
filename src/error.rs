//! Unified error types for the aggregation service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::upstream::Provider;

/// Body returned to clients for any upstream failure.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Could not contact API server";

/// Process-level error type.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP client construction error.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

}

/// Failures talking to, or making sense of, an upstream provider.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Transport-level failure: unreachable host, reset, timeout.
    #[error("{provider} unreachable: {source}")]
    Network {
        /// Provider that was called.
        provider: Provider,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Provider answered with something other than 200.
    #[error("{provider} responded with {status}")]
    Status {
        /// Provider that was called.
        provider: Provider,
        /// Raw status line, e.g. "503 Service Unavailable".
        status: String,
    },

    /// Body was not well-formed JSON of the expected shape.
    #[error("failed to decode {provider} response: {source}")]
    Decode {
        /// Provider that was called.
        provider: Provider,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed JSON without a key we depend on.
    #[error("{provider} response is missing `{field}`")]
    MissingField {
        /// Provider that was called.
        provider: Provider,
        /// Dotted path of the absent key.
        field: String,
    },

    /// A key was present with the wrong JSON type.
    #[error("{provider} response has an unexpected shape: {reason}")]
    TypeMismatch {
        /// Provider that was called.
        provider: Provider,
        /// Parser explanation.
        reason: String,
    },

    /// Metadata lookup returned no country.
    #[error("no country matches `{0}`")]
    CountryNotFound(String),
}

impl UpstreamError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Status { .. } => "status",
            Self::Decode { .. } => "decode",
            Self::MissingField { .. } => "missing_field",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::CountryNotFound(_) => "country_not_found",
        }
    }

    pub(crate) fn missing(provider: Provider, field: impl Into<String>) -> Self {
        Self::MissingField {
            provider,
            field: field.into(),
        }
    }
}

/// Errors surfaced by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Path or parameter shape the service cannot interpret.
    #[error("{0}")]
    MalformedRequest(String),

    /// Route exists but the method is not supported.
    #[error("Not implemented")]
    NotImplemented,

    /// Resolver failure.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MalformedRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            Self::NotImplemented => {
                (StatusCode::NOT_IMPLEMENTED, self.to_string()).into_response()
            }
            Self::Upstream(err) => {
                // Detail stays in the operator log.
                error!(error = %err, kind = err.kind(), "upstream request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UPSTREAM_FAILURE_MESSAGE.to_string(),
                )
                    .into_response()
            }
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_request_maps_to_400() {
        let response = ApiError::MalformedRequest("Malformed URL".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_failure_maps_to_500() {
        let err = UpstreamError::Status {
            provider: Provider::Cases,
            status: "503 Service Unavailable".to_string(),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_kinds_are_stable() {
        assert_eq!(UpstreamError::CountryNotFound("Atlantis".into()).kind(), "country_not_found");
        assert_eq!(
            UpstreamError::missing(Provider::Policy, "data").kind(),
            "missing_field"
        );
    }
}
