use chrono::NaiveDate;
use paddy::error::ProviderError;
use paddy::sources::{Coordinates, DayWeather, ForecastDay, WeatherLookup, WeatherSource};

use crate::client::Client;
use crate::convert::rsp_req::{ForecastResponse, SearchHit};

fn q(at: Coordinates) -> String {
    format!("{},{}", at.lat, at.lon)
}

impl Client {
    /// Geocodes a free-text location; the first hit wins.
    pub async fn search(&self, query: &str) -> Result<SearchHit, ProviderError> {
        let hits: Vec<SearchHit> = self
            .get_json("search.json", &[("q", query.to_string())])
            .await?;
        hits.into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound(query.to_string()))
    }

    pub async fn forecast_days(
        &self,
        at: Coordinates,
        days: u32,
    ) -> Result<ForecastResponse, ProviderError> {
        self.get_json(
            "forecast.json",
            &[
                ("q", q(at)),
                ("days", days.to_string()),
                ("aqi", "no".to_string()),
                ("alerts", "no".to_string()),
            ],
        )
        .await
    }

    pub async fn history_day(
        &self,
        at: Coordinates,
        date: NaiveDate,
    ) -> Result<ForecastResponse, ProviderError> {
        self.get_json(
            "history.json",
            &[("q", q(at)), ("dt", date.format("%Y-%m-%d").to_string())],
        )
        .await
    }
}

impl WeatherSource for Client {
    async fn locate(&self, query: &str) -> Result<Coordinates, ProviderError> {
        let hit = self.search(query).await?;
        tracing::info!(
            query,
            name = %hit.name,
            region = %hit.region,
            country = %hit.country,
            lat = hit.lat,
            lon = hit.lon,
            "location resolved"
        );
        Ok(Coordinates::from(&hit))
    }

    async fn day_weather(
        &self,
        at: Coordinates,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<DayWeather, ProviderError> {
        let (response, index) = match WeatherLookup::for_date(date, today) {
            WeatherLookup::History(date) => (self.history_day(at, date).await?, 0),
            WeatherLookup::Forecast { index } => (
                self.forecast_days(at, WeatherLookup::FORECAST_DAYS).await?,
                index,
            ),
        };
        response
            .forecast
            .forecastday
            .get(index)
            .map(|entry| DayWeather::from(&entry.day))
            .ok_or_else(|| ProviderError::NotFound(format!("weather for {date}")))
    }

    async fn forecast(
        &self,
        at: Coordinates,
        days: u32,
    ) -> Result<Vec<ForecastDay>, ProviderError> {
        let response = self.forecast_days(at, days).await?;
        Ok(response
            .forecast
            .forecastday
            .into_iter()
            .map(ForecastDay::from)
            .collect())
    }
}
