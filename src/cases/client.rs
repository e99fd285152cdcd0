//! Case-statistics API client.

use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;
use crate::error::{ServiceError, UpstreamError};
use crate::scope::DateScope;
use crate::upstream::{self, decode_as, decode_map, Provider};

use super::types::{CaseInfo, CasesResponse, HistoryResponse};

const PROVIDER: Provider = Provider::Cases;

/// Case-statistics API client.
#[derive(Debug, Clone)]
pub struct CaseClient {
    /// Shared HTTP client.
    http: reqwest::Client,
    /// Provider base URL, e.g. `https://covid-api.mmediagroup.fr/v1`.
    base: Url,
}

impl CaseClient {
    /// Create a client from config.
    pub fn new(http: reqwest::Client, config: &Config) -> Result<Self, ServiceError> {
        Ok(Self {
            http,
            base: upstream::base_url("CASES_API_URL", &config.cases_api_url)?,
        })
    }

    /// Get the provider base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a country's case figures for the given scope.
    ///
    /// `country` must already be normalized; the provider is case-sensitive.
    #[instrument(skip(self, scope), fields(scope = %scope.label()))]
    pub async fn resolve_cases(
        &self,
        country: &str,
        scope: &DateScope,
    ) -> Result<CaseInfo, UpstreamError> {
        let info = match scope {
            DateScope::Total => {
                let url = self.country_url("cases", country, &[]);
                let response = upstream::fetch(&self.http, PROVIDER, url).await?;
                let map = decode_map(PROVIDER, response, None).await?;
                CaseInfo::from_totals(decode_as::<CasesResponse>(PROVIDER, map)?)?
            }
            DateScope::Range { start, end } => {
                let url = self.country_url("history", country, &[("status", "Confirmed")]);
                let response = upstream::fetch(&self.http, PROVIDER, url).await?;
                let map = decode_map(PROVIDER, response, None).await?;
                CaseInfo::from_history(decode_as::<HistoryResponse>(PROVIDER, map)?, start, end)?
            }
        };

        debug!(confirmed = info.confirmed, "resolved case figures");
        Ok(info)
    }

    /// Probe the provider and report its status line.
    pub async fn health_check(&self) -> Result<String, UpstreamError> {
        upstream::health_check(&self.http, PROVIDER, upstream::endpoint(&self.base, &["cases"]))
            .await
    }

    fn country_url(&self, resource: &str, country: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = upstream::endpoint(&self.base, &[resource]);
        url.query_pairs_mut()
            .append_pair("country", country)
            .extend_pairs(extra);
        url
    }
}
