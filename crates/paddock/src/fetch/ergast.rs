//! Ergast-compatible results API client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::ResultSource;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::RaceResultRecord;

/// Default API root; the season and `results.json` are appended to it.
pub const DEFAULT_BASE_URL: &str = "http://ergast.com/api/f1";

/// Default cap on the number of results requested per season.
pub const DEFAULT_RESULT_LIMIT: u32 = 1000;

#[derive(Debug, Deserialize)]
struct ResultsResponse {
    #[serde(rename = "MRData")]
    mr_data: MrData,
}

#[derive(Debug, Deserialize)]
struct MrData {
    #[serde(default)]
    total: Option<String>,
    #[serde(rename = "RaceTable")]
    race_table: RaceTable,
}

#[derive(Debug, Deserialize)]
struct RaceTable {
    #[serde(rename = "Races", default)]
    races: Vec<Race>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Race {
    round: String,
    race_name: String,
    date: String,
    #[serde(rename = "Results", default)]
    results: Vec<RaceResult>,
}

#[derive(Debug, Deserialize)]
struct RaceResult {
    position: String,
    points: String,
    #[serde(rename = "Driver")]
    driver: Driver,
    #[serde(rename = "Constructor")]
    constructor: Constructor,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Driver {
    given_name: String,
    family_name: String,
}

#[derive(Debug, Deserialize)]
struct Constructor {
    name: String,
}

impl ResultsResponse {
    fn result_count(&self) -> usize {
        self.mr_data
            .race_table
            .races
            .iter()
            .map(|race| race.results.len())
            .sum()
    }

    /// Total results the API holds for the query, when it reports one.
    fn reported_total(&self) -> Option<usize> {
        self.mr_data.total.as_deref().and_then(|t| t.parse().ok())
    }

    fn into_records(self, season: i32) -> Result<Vec<RaceResultRecord>> {
        let mut records = Vec::with_capacity(self.result_count());

        for race in self.mr_data.race_table.races {
            let round: u32 = race.round.parse().map_err(|_| {
                Error::parse(format!(
                    "{}: round '{}' is not an integer",
                    race.race_name, race.round
                ))
            })?;
            let date = NaiveDate::parse_from_str(&race.date, "%Y-%m-%d").map_err(|_| {
                Error::parse(format!("round {round}: date '{}' is not YYYY-MM-DD", race.date))
            })?;

            for result in race.results {
                let position: u32 = result.position.parse().map_err(|_| {
                    Error::parse(format!(
                        "round {round}: position '{}' is not an integer",
                        result.position
                    ))
                })?;
                if position == 0 {
                    return Err(Error::parse(format!("round {round}: position must be >= 1")));
                }

                let points: f64 = result.points.parse().map_err(|_| {
                    Error::parse(format!(
                        "round {round}: points '{}' is not a number",
                        result.points
                    ))
                })?;
                if !points.is_finite() || points < 0.0 {
                    return Err(Error::parse(format!(
                        "round {round}: points '{}' must be a non-negative number",
                        result.points
                    )));
                }

                records.push(RaceResultRecord {
                    season,
                    round,
                    race: race.race_name.clone(),
                    date,
                    position,
                    driver: format!(
                        "{} {}",
                        result.driver.given_name, result.driver.family_name
                    ),
                    constructor: result.constructor.name,
                    points,
                });
            }
        }

        Ok(records)
    }
}

/// Flatten a raw results payload into one record per finish.
///
/// Every record is stamped with `season`, whatever the payload says.
///
/// # Errors
///
/// Returns an error if `body` is not JSON of the expected shape, or if a
/// round, position, points or date value cannot be converted.
pub fn flatten_response(season: i32, body: &str) -> Result<Vec<RaceResultRecord>> {
    let response: ResultsResponse = serde_json::from_str(body)?;
    response.into_records(season)
}

/// Client for an Ergast-compatible `/{season}/results.json` endpoint.
#[derive(Debug, Clone)]
pub struct ErgastSource {
    client: reqwest::Client,
    base_url: String,
    result_limit: u32,
}

impl ErgastSource {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, result_limit: u32, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::ClientBuild)?;
        Ok(Self {
            client,
            base_url,
            result_limit,
        })
    }

    /// Create a client from the `[source]` section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.source.base_url.clone(),
            config.source.result_limit,
            config.request_timeout(),
        )
    }

    /// The URL queried for `season`, without the limit parameter.
    #[must_use]
    pub fn season_url(&self, season: i32) -> String {
        format!("{}/{season}/results.json", self.base_url)
    }
}

#[async_trait]
impl ResultSource for ErgastSource {
    fn name(&self) -> &'static str {
        "ergast"
    }

    async fn fetch_season(&self, season: i32) -> Result<Vec<RaceResultRecord>> {
        let url = self.season_url(season);
        info!("Fetching {} results from {}", season, url);

        let response = self
            .client
            .get(&url)
            .query(&[("limit", self.result_limit)])
            .send()
            .await
            .map_err(|source| Error::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| Error::Network {
            url: url.clone(),
            source,
        })?;
        debug!("Received {} bytes from {}", body.len(), url);

        let payload: ResultsResponse = serde_json::from_str(&body)?;
        let returned = payload.result_count();
        if let Some(total) = payload.reported_total() {
            if total > returned {
                warn!(
                    "Season {} has {} results but only {} were returned (limit {}); \
                     the rest are dropped",
                    season, total, returned, self.result_limit
                );
            }
        }

        let records = payload.into_records(season)?;
        info!("Fetched {} results for season {}", records.len(), season);
        Ok(records)
    }
}
