//! Planting session service for paddy farmers.
//!
//! A farmer registers a field, the service gathers weather, solar, soil and
//! vegetation inputs for the planting date, predicts the yield, and lays out
//! the cultivation tasks of the chosen workflow template.

pub mod config;
pub mod entities;
pub mod error;
pub mod http;
pub mod services;
pub mod store;
pub mod telemetry;

use paddy::aggregate::FieldDataAggregator;
use paddy::error::ClientBuilderError;

pub use config::Config;
pub use error::FarmError;
pub use services::Farm;

/// The production data sources.
pub type Sources =
    FieldDataAggregator<paddy_weatherapi::Client, paddy_power::Client, paddy_earth::Client>;

/// Builds the provider clients, honouring base URL overrides from `config`.
pub fn build_sources(config: &Config) -> Result<Sources, ClientBuilderError> {
    let mut weather = paddy_weatherapi::Client::builder().api_key(config.weatherapi_key.clone());
    if let Some(base) = config.weatherapi_base_url.as_deref() {
        weather = weather.base_url(base);
    }

    let mut solar = paddy_power::Client::builder();
    if let Some(base) = config.power_base_url.as_deref() {
        solar = solar.base_url(base);
    }

    let mut earth = paddy_earth::Client::builder().ndvi_base_url(config.ndvi_base_url.as_deref());
    if let Some(base) = config.soilgrids_base_url.as_deref() {
        earth = earth.soilgrids_base_url(base);
    }

    let weather = weather.build()?;
    if !weather.has_api_key() {
        tracing::warn!("WEATHERAPI_KEY is not set; geocoding and weather lookups will fail");
    }
    Ok(FieldDataAggregator::new(weather, solar.build()?, earth.build()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use httpmock::prelude::*;
    use paddy::predictor::Predictor;
    use paddy::sources::{Coordinates, WeatherSource};
    use serde_json::json;

    const SHIPPED_CSV: &str = include_str!("../data/paddy_training.csv");

    #[tokio::test]
    async fn sources_follow_configured_base_urls() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/search.json")
                    .query_param("key", "k")
                    .query_param("q", "Sekinchan");
                then.status(200).json_body(json!([{
                    "name": "Sekinchan",
                    "region": "Selangor",
                    "country": "Malaysia",
                    "lat": 3.5,
                    "lon": 101.1
                }]));
            })
            .await;

        let base = server.url("/v1");
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "WEATHERAPI_KEY" => Some("k".to_string()),
            "WEATHERAPI_BASE_URL" => Some(base.clone()),
            _ => None,
        })
        .unwrap();

        let sources = build_sources(&config).unwrap();
        let at = sources.weather.locate("Sekinchan").await.unwrap();
        mock.assert_async().await;
        assert_eq!(at, Coordinates::new(3.5, 101.1));
    }

    #[test]
    fn shipped_dataset_trains() {
        let dir = assert_fs::TempDir::new().unwrap();
        let csv = dir.child("paddy_training.csv");
        csv.write_str(SHIPPED_CSV).unwrap();

        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "TRAINING_CSV" => Some(csv.path().display().to_string()),
            _ => None,
        })
        .unwrap();
        let predictor = Predictor::train_from_path(&config.training_csv).unwrap();

        let healthy = paddy::FeatureVector {
            ndvi: 0.8,
            tmin: 24.0,
            tmax: 33.0,
            rain: 15.0,
            srad: 5.5,
            soil_ph: 6.2,
            soil_cec: 20.0,
            soil_oc: 2.5,
        };
        let stressed = paddy::FeatureVector {
            ndvi: 0.1,
            srad: 1.0,
            ..healthy
        };
        assert!(predictor.yield_per_ha(&healthy) > predictor.yield_per_ha(&stressed));
    }
}
