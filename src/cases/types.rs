//! Case-statistics types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;
use crate::upstream::{decode::require, mismatch, Provider};

const PROVIDER: Provider = Provider::Cases;

/// Normalized case figures for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseInfo {
    /// Country name as reported upstream.
    pub country: String,
    /// Continent as reported upstream.
    pub continent: String,
    /// `total` or `<start>-<end>`.
    pub scope: String,
    /// Total confirmed cases, or new confirmed cases within the scope.
    pub confirmed: i64,
    /// Total recovered. Always 0 for a date range: the provider has no
    /// recovered history.
    pub recovered: i64,
    /// `confirmed / population * 100`, two decimals.
    pub population_percentage: String,
}

/// `GET /cases?country=` body.
#[derive(Debug, Clone, Deserialize)]
pub struct CasesResponse {
    /// Whole-country figures.
    #[serde(rename = "All")]
    pub all: Option<CasesSummary>,
}

/// Whole-country totals.
#[derive(Debug, Clone, Deserialize)]
pub struct CasesSummary {
    /// Country name.
    pub country: Option<String>,
    /// Continent name.
    pub continent: Option<String>,
    /// Cumulative confirmed cases.
    pub confirmed: Option<i64>,
    /// Cumulative recovered cases.
    pub recovered: Option<i64>,
    /// Population.
    pub population: Option<i64>,
}

/// `GET /history?country=&status=Confirmed` body.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    /// Whole-country history.
    #[serde(rename = "All")]
    pub all: Option<HistorySummary>,
}

/// Whole-country cumulative confirmed counts keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistorySummary {
    /// Country name.
    pub country: Option<String>,
    /// Continent name.
    pub continent: Option<String>,
    /// Population.
    pub population: Option<i64>,
    /// Cumulative confirmed count per date.
    pub dates: Option<HashMap<String, i64>>,
}

/// Share of the population with a confirmed case, formatted to two decimals.
///
/// `population` must be positive; the resolvers reject anything else first.
pub fn population_percentage(confirmed: i64, population: i64) -> String {
    format!("{:.2}", confirmed as f64 / population as f64 * 100.0)
}

/// Population the percentage is computed against. Must be positive.
fn checked_population(value: Option<i64>) -> Result<i64, UpstreamError> {
    let population = require(PROVIDER, value, "All.population")?;
    if population <= 0 {
        return Err(mismatch(
            PROVIDER,
            format!("All.population must be positive, got {population}"),
        ));
    }
    Ok(population)
}

impl CaseInfo {
    /// Build the all-time record.
    pub fn from_totals(response: CasesResponse) -> Result<Self, UpstreamError> {
        let all = require(PROVIDER, response.all, "All")?;
        let confirmed = require(PROVIDER, all.confirmed, "All.confirmed")?;
        let population = checked_population(all.population)?;

        Ok(Self {
            country: require(PROVIDER, all.country, "All.country")?,
            continent: all.continent.unwrap_or_default(),
            scope: "total".to_string(),
            confirmed,
            recovered: require(PROVIDER, all.recovered, "All.recovered")?,
            population_percentage: population_percentage(confirmed, population),
        })
    }

    /// Build the record for `start..=end` from cumulative history.
    pub fn from_history(
        response: HistoryResponse,
        start: &str,
        end: &str,
    ) -> Result<Self, UpstreamError> {
        let all = require(PROVIDER, response.all, "All")?;
        let dates = require(PROVIDER, all.dates, "All.dates")?;
        let count_on = |date: &str| {
            require(PROVIDER, dates.get(date).copied(), &format!("All.dates.{date}"))
        };
        let confirmed = count_on(end)?
            .checked_sub(count_on(start)?)
            .ok_or_else(|| mismatch(PROVIDER, format!("All.dates {end} minus {start} overflows")))?;
        let population = checked_population(all.population)?;

        Ok(Self {
            country: require(PROVIDER, all.country, "All.country")?,
            continent: all.continent.unwrap_or_default(),
            scope: format!("{start}-{end}"),
            confirmed,
            recovered: 0,
            population_percentage: population_percentage(confirmed, population),
        })
    }
}
