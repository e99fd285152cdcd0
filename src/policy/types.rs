//! Policy-stringency types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;
use crate::upstream::{decode::require, Provider};

use super::stringency::{resolve, trend, StringencyKey, UNKNOWN_STRINGENCY};

const PROVIDER: Provider = Provider::Policy;

/// Normalized stringency figures for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringencyInfo {
    /// Country name as requested; the provider only knows alpha-3 codes.
    pub country: String,
    /// Always `total`, including for date-range requests.
    pub scope: String,
    /// Latest stringency index, or the end-date index for a range.
    pub stringency: f64,
    /// End minus start index for a range, 0 otherwise.
    pub trend: f64,
}

/// One entry of the country metadata lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryRecord {
    /// ISO 3166-1 alpha-3 code.
    #[serde(rename = "alpha3Code")]
    pub alpha3_code: Option<String>,
    /// Region, e.g. "Europe".
    pub region: Option<String>,
}

/// Resolved country identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCode {
    /// ISO 3166-1 alpha-3 code.
    pub alpha3: String,
    /// Region, empty when the provider has none.
    pub region: String,
}

/// Index values for one country and date. Either key may be absent or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StringencyValues {
    /// Index computed from the recorded measures.
    pub stringency_actual: Option<f64>,
    /// Index including the provider's imputations.
    pub stringency: Option<f64>,
}

impl StringencyValues {
    /// Value stored under `key`.
    pub fn get(&self, key: StringencyKey) -> Option<f64> {
        match key {
            StringencyKey::Actual => self.stringency_actual,
            StringencyKey::Index => self.stringency,
        }
    }
}

/// `GET /v2/stringency/actions/{alpha3}/{date}` body.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestActionsResponse {
    /// Index values; `{"msg": "Data unavailable"}` when there is no data.
    #[serde(rename = "stringencyData")]
    pub stringency_data: Option<StringencyValues>,
}

/// `GET /v2/stringency/date-range/{start}/{end}` body.
#[derive(Debug, Clone, Deserialize)]
pub struct DateRangeResponse {
    /// Values keyed by date, then alpha-3 code.
    pub data: Option<HashMap<String, HashMap<String, StringencyValues>>>,
}

impl DateRangeResponse {
    /// Values for one date and country, if the provider has an entry.
    pub fn values(&self, date: &str, alpha3: &str) -> Option<&StringencyValues> {
        self.data.as_ref()?.get(date)?.get(alpha3)
    }
}

impl StringencyInfo {
    /// Build the record from the latest-actions endpoint.
    pub fn latest(country: &str, response: LatestActionsResponse) -> Result<Self, UpstreamError> {
        let values = require(PROVIDER, response.stringency_data, "stringencyData")?;

        Ok(Self {
            country: country.to_string(),
            scope: "total".to_string(),
            stringency: resolve(Some(&values)).unwrap_or(UNKNOWN_STRINGENCY),
            trend: 0.0,
        })
    }

    /// Build the record for `start..=end` from the date-range endpoint.
    ///
    /// Scope stays `total` to match the published contract even though a
    /// range was requested.
    pub fn from_range(
        country: &str,
        alpha3: &str,
        response: &DateRangeResponse,
        start: &str,
        end: &str,
    ) -> Result<Self, UpstreamError> {
        require(PROVIDER, response.data.as_ref(), "data")?;

        let start_value = resolve(response.values(start, alpha3));
        let end_value = resolve(response.values(end, alpha3));

        Ok(Self {
            country: country.to_string(),
            scope: "total".to_string(),
            stringency: end_value.unwrap_or(UNKNOWN_STRINGENCY),
            trend: trend(start_value, end_value),
        })
    }
}
