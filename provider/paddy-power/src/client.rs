use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use chrono::NaiveDate;
use paddy::error::{ClientBuilderError, ProviderError};
use paddy::sources::{Coordinates, SolarSource};
use serde::Deserialize;
use url::Url;

use crate::SRAD_PARAMETER;

const POWER_API_BASE_URL: &str = "https://power.larc.nasa.gov/";
const DAILY_POINT_PATH: &str = "api/temporal/daily/point";
const DATE_FORMAT: &str = "%Y%m%d";

/// Single-day lookups are quick; a year of dailies takes longer to assemble.
const SHORT_TIMEOUT: Duration = Duration::from_secs(10);
const LONG_TIMEOUT: Duration = Duration::from_secs(20);

pub struct ClientBuilder<'a> {
    base_url: &'a str,
    http_client: Option<reqwest::Client>,
}

impl<'a> ClientBuilder<'a> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            base_url: POWER_API_BASE_URL,
            http_client: None,
        }
    }

    pub fn base_url(mut self, base_url: &'a str) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn custom_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<Client, ClientBuilderError> {
        let http_client = if let Some(http_client) = self.http_client {
            http_client
        } else {
            reqwest::Client::builder().build()?
        };
        let base = if self.base_url.ends_with('/') {
            self.base_url.to_string()
        } else {
            format!("{}/", self.base_url)
        };

        Ok(Client {
            base_url: Url::parse(&base)
                .map_err(|_| ClientBuilderError::InvalidProperty("base_url"))?,
            http_client,
        })
    }
}

#[derive(Clone, Debug)]
pub struct Client {
    base_url: Url,
    http_client: reqwest::Client,
}

impl Client {
    pub fn builder<'a>() -> ClientBuilder<'a> {
        ClientBuilder::new()
    }

    pub(crate) fn get(&self, path: &str) -> Result<reqwest::RequestBuilder, url::ParseError> {
        let url = self.base_url.join(path)?;
        Ok(self.http_client.get(url))
    }

    /// Daily values keyed by `YYYYMMDD`, exactly as POWER returns them.
    pub async fn daily_point(
        &self,
        at: Coordinates,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<String, f64>, ProviderError> {
        let timeout = if start == end { SHORT_TIMEOUT } else { LONG_TIMEOUT };
        let response = self
            .get(DAILY_POINT_PATH)?
            .timeout(timeout)
            .query(&[
                ("parameters", SRAD_PARAMETER.to_string()),
                ("community", "RE".to_string()),
                ("longitude", at.lon.to_string()),
                ("latitude", at.lat.to_string()),
                ("start", start.format(DATE_FORMAT).to_string()),
                ("end", end.format(DATE_FORMAT).to_string()),
                ("format", "JSON".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ProviderError::ProviderError(format!(
                "{status}: {}",
                response.text().await?
            )));
        }

        let body: PointResponse = serde_json::from_slice(&response.bytes().await?)?;
        Ok(body.properties.parameter.series)
    }
}

#[derive(Debug, Deserialize)]
struct PointResponse {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    parameter: Parameter,
}

#[derive(Debug, Deserialize)]
struct Parameter {
    #[serde(rename = "ALLSKY_SFC_SW_DWN", default)]
    series: HashMap<String, f64>,
}

impl SolarSource for Client {
    async fn daily_srad(
        &self,
        at: Coordinates,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, f64>, ProviderError> {
        let raw = self.daily_point(at, start, end).await?;
        let mut series = BTreeMap::new();
        for (key, value) in raw {
            match NaiveDate::parse_from_str(&key, DATE_FORMAT) {
                Ok(day) => {
                    series.insert(day, value);
                }
                Err(_) => {
                    tracing::debug!(target: "paddy::power", key = %key, "skipping non-date key")
                }
            }
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const AT: Coordinates = Coordinates { lat: 6.12, lon: 100.37 };

    #[tokio::test]
    async fn parses_daily_series_by_date() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/temporal/daily/point")
                    .query_param("parameters", "ALLSKY_SFC_SW_DWN")
                    .query_param("community", "RE")
                    .query_param("latitude", "6.12")
                    .query_param("longitude", "100.37")
                    .query_param("start", "20240101")
                    .query_param("end", "20240103")
                    .query_param("format", "JSON");
                then.status(200).json_body(json!({
                    "type": "Feature",
                    "properties": { "parameter": { "ALLSKY_SFC_SW_DWN": {
                        "20240101": 5.12, "20240102": -999.0, "20240103": 4.87
                    } } }
                }));
            })
            .await;

        let client = Client::builder().base_url(&server.base_url()).build().unwrap();
        let series = client
            .daily_srad(AT, date("2024-01-01"), date("2024-01-03"))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(series.len(), 3);
        assert_eq!(series[&date("2024-01-01")], 5.12);
        // fill values are left for the caller to interpret
        assert_eq!(series[&date("2024-01-02")], -999.0);
    }

    #[tokio::test]
    async fn error_status_is_a_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/api/temporal/daily/point");
                then.status(422).body("{\"messages\":[\"start date is after end date\"]}");
            })
            .await;

        let client = Client::builder().base_url(&server.base_url()).build().unwrap();
        let err = client
            .daily_srad(AT, date("2024-01-03"), date("2024-01-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ProviderError(ref msg) if msg.starts_with("422")));
    }
}
