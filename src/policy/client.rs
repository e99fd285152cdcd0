//! Policy-stringency API client.

use reqwest::StatusCode;
use time::{Date, Duration, OffsetDateTime};
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::error::{ServiceError, UpstreamError};
use crate::scope::DateScope;
use crate::upstream::{self, decode::require, decode_as, decode_json, decode_map, Provider};

use super::types::{
    CountryCode, CountryRecord, DateRangeResponse, LatestActionsResponse, StringencyInfo,
};

const PROVIDER: Provider = Provider::Policy;

/// The provider only guarantees complete data up to this many days ago.
pub const REPORTING_LAG_DAYS: i64 = 10;

/// Policy-stringency API client.
#[derive(Debug, Clone)]
pub struct PolicyClient {
    /// Shared HTTP client.
    http: reqwest::Client,
    /// Provider base URL, e.g. `https://covidtrackerapi.bsg.ox.ac.uk/api`.
    base: Url,
    /// Country metadata base URL used for alpha-3 lookups.
    countries: Url,
}

impl PolicyClient {
    /// Create a client from config.
    pub fn new(http: reqwest::Client, config: &Config) -> Result<Self, ServiceError> {
        Ok(Self {
            http,
            base: upstream::base_url("POLICY_API_URL", &config.policy_api_url)?,
            countries: upstream::base_url("COUNTRIES_API_URL", &config.countries_api_url)?,
        })
    }

    /// Get the provider base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a country's stringency figures for the given scope.
    #[instrument(skip(self, scope), fields(scope = %scope.label()))]
    pub async fn resolve_policy(
        &self,
        country: &str,
        scope: &DateScope,
    ) -> Result<StringencyInfo, UpstreamError> {
        let code = self.lookup_country(country).await?;
        debug!(alpha3 = %code.alpha3, region = %code.region, "resolved country code");

        match scope {
            DateScope::Total => {
                let date = reference_date(OffsetDateTime::now_utc().date());
                let url = upstream::endpoint(
                    &self.base,
                    &["v2", "stringency", "actions", code.alpha3.as_str(), date.as_str()],
                );
                let response = upstream::fetch(&self.http, PROVIDER, url).await?;
                let map = decode_map(PROVIDER, response, None).await?;
                StringencyInfo::latest(country, decode_as::<LatestActionsResponse>(PROVIDER, map)?)
            }
            DateScope::Range { start, end } => {
                let url = upstream::endpoint(
                    &self.base,
                    &["v2", "stringency", "date-range", start.as_str(), end.as_str()],
                );
                let response = upstream::fetch(&self.http, PROVIDER, url).await?;
                // The per-country listing is large and unused.
                let map = decode_map(PROVIDER, response, Some("countries")).await?;
                let range = decode_as::<DateRangeResponse>(PROVIDER, map)?;
                StringencyInfo::from_range(country, &code.alpha3, &range, start, end)
            }
        }
    }

    /// Look up a country's alpha-3 code and region by name.
    #[instrument(skip(self))]
    pub async fn lookup_country(&self, country: &str) -> Result<CountryCode, UpstreamError> {
        let url = upstream::endpoint(&self.countries, &["name", country]);
        let response = upstream::fetch(&self.http, Provider::Countries, url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(UpstreamError::CountryNotFound(country.to_string()));
        }

        let records: Vec<CountryRecord> = decode_json(Provider::Countries, response).await?;
        // Partial name matches come back too; the first entry wins.
        let first = records
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::CountryNotFound(country.to_string()))?;

        Ok(CountryCode {
            alpha3: require(Provider::Countries, first.alpha3_code, "[0].alpha3Code")?,
            region: first.region.unwrap_or_default(),
        })
    }

    /// Probe the provider and report its status line.
    pub async fn health_check(&self) -> Result<String, UpstreamError> {
        upstream::health_check(&self.http, PROVIDER, upstream::endpoint(&self.base, &[""])).await
    }
}

/// Most recent date with complete data, as `YYYY-MM-DD`.
pub fn reference_date(today: Date) -> String {
    let date = today - Duration::days(REPORTING_LAG_DAYS);
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
