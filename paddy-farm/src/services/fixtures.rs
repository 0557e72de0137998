//! Offline sources and a seeded in-memory store for service and route tests.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use paddy::aggregate::FieldDataAggregator;
use paddy::error::ProviderError;
use paddy::predictor::{Predictor, YieldModel};
use paddy::sources::{
    Coordinates, DayWeather, EarthSource, ForecastDay, SoilProfile, SolarSource, WeatherSource,
};
use sea_orm::ActiveModelTrait;
use sea_orm::ActiveValue::Set;

use super::Farm;
use crate::entities::user;
use crate::store;

pub const ALOR_SETAR: Coordinates = Coordinates { lat: 6.12, lon: 100.37 };
pub const FARMER_IC: &str = "800101-02-1234";
pub const NEIGHBOUR_IC: &str = "850505-09-8765";

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Always answers with the same healthy readings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Steady;

impl WeatherSource for Steady {
    async fn locate(&self, query: &str) -> Result<Coordinates, ProviderError> {
        if query == "Atlantis" {
            return Err(ProviderError::NotFound(query.to_string()));
        }
        Ok(ALOR_SETAR)
    }

    async fn day_weather(
        &self,
        _at: Coordinates,
        _date: NaiveDate,
        _today: NaiveDate,
    ) -> Result<DayWeather, ProviderError> {
        Ok(DayWeather {
            tmin: 24.5,
            tmax: 33.0,
            rain: 8.0,
        })
    }

    async fn forecast(
        &self,
        _at: Coordinates,
        days: u32,
    ) -> Result<Vec<ForecastDay>, ProviderError> {
        let start = date("2024-06-10");
        Ok((0..days)
            .map(|i| ForecastDay {
                date: start + chrono::Duration::days(i64::from(i)),
                condition: "Partly cloudy".into(),
                icon: "//cdn/116.png".into(),
                temp_max: 32.0,
                temp_min: 24.0,
                rain: 1.5,
            })
            .collect())
    }
}

impl SolarSource for Steady {
    async fn daily_srad(
        &self,
        _at: Coordinates,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, f64>, ProviderError> {
        Ok(start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| (d, 5.2))
            .collect())
    }
}

impl EarthSource for Steady {
    async fn latest_ndvi(
        &self,
        _at: Coordinates,
        _date: NaiveDate,
    ) -> Result<Option<f64>, ProviderError> {
        Ok(Some(0.74))
    }

    async fn soil(&self, _at: Coordinates) -> Result<SoilProfile, ProviderError> {
        Ok(SoilProfile {
            ph: Some(6.1),
            cec: Some(18.0),
            oc: Some(2.2),
        })
    }
}

/// Predicts a constant yield per hectare.
pub struct Flat(pub f64);

impl YieldModel for Flat {
    fn predict(&self, _normalized: &[f64; 8]) -> f64 {
        self.0
    }
}

pub type TestFarm = Farm<Steady, Steady, Steady>;

/// A fresh in-memory farm with two registered users.
pub async fn farm(predictor: Option<Predictor>) -> TestFarm {
    let db = store::connect("sqlite::memory:").await.unwrap();
    for (ic, name) in [(FARMER_IC, "Siti Aminah"), (NEIGHBOUR_IC, "Ahmad Zaki")] {
        user::ActiveModel {
            ic: Set(ic.to_string()),
            fullname: Set(name.to_string()),
            state: Set("Kedah".to_string()),
            phone: Set("012-3456789".to_string()),
            password: Set("padi123".to_string()),
        }
        .insert(&db)
        .await
        .unwrap();
    }
    Farm::new(db, FieldDataAggregator::new(Steady, Steady, Steady), predictor)
}
