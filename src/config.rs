//! Application configuration loaded from environment variables.

use serde::Deserialize;
use url::Url;

use crate::error::{self, ServiceError};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP listen port. Required: there is no sensible default.
    pub port: u16,

    // === Upstream Providers ===
    /// Case-statistics API base URL.
    #[serde(default = "default_cases_api_url")]
    pub cases_api_url: String,

    /// Policy-stringency API base URL.
    #[serde(default = "default_policy_api_url")]
    pub policy_api_url: String,

    /// Country metadata API base URL (alpha-3 lookup).
    #[serde(default = "default_countries_api_url")]
    pub countries_api_url: String,

    /// Outbound request timeout. Unset leaves the transport default.
    #[serde(default)]
    pub http_timeout_ms: Option<u64>,

    // === Metrics ===
    /// Prometheus exporter port; metrics are not exported when unset.
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_cases_api_url() -> String {
    "https://covid-api.mmediagroup.fr/v1".to_string()
}

fn default_policy_api_url() -> String {
    "https://covidtrackerapi.bsg.ox.ac.uk/api".to_string()
}

fn default_countries_api_url() -> String {
    "https://restcountries.com/v2".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> error::Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Configuration with the public provider defaults and the given port.
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            cases_api_url: default_cases_api_url(),
            policy_api_url: default_policy_api_url(),
            countries_api_url: default_countries_api_url(),
            http_timeout_ms: None,
            metrics_port: None,
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> error::Result<()> {
        if self.port == 0 {
            return Err(invalid("PORT must be a non-zero port number"));
        }

        for (name, value) in [
            ("CASES_API_URL", &self.cases_api_url),
            ("POLICY_API_URL", &self.policy_api_url),
            ("COUNTRIES_API_URL", &self.countries_api_url),
        ] {
            parse_base_url(value).map_err(|reason| invalid(format!("{name} {reason}")))?;
        }

        if self.http_timeout_ms == Some(0) {
            return Err(invalid("HTTP_TIMEOUT_MS must be greater than 0 when set"));
        }

        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> ServiceError {
    ServiceError::InvalidConfig(reason.into())
}

/// Parse a provider base URL that later gets path segments appended.
pub fn parse_base_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| format!("is not a valid URL: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("must use http or https, got {}", url.scheme()));
    }
    if url.cannot_be_a_base() {
        return Err("cannot carry path segments".to_string());
    }
    Ok(url)
}
