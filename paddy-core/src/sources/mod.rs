//! Traits implemented by the external data providers.
//!
//! Each provider is an independent, fallible JSON-over-HTTP collaborator. The
//! aggregator treats every error the same way: log it and use a default.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Daily min/max temperature (°C) and total precipitation (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayWeather {
    pub tmin: f64,
    pub tmax: f64,
    pub rain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub condition: String,
    pub icon: String,
    pub temp_max: f64,
    pub temp_min: f64,
    pub rain: f64,
}

/// Topsoil (0-5 cm) properties, already converted to model units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    pub ph: Option<f64>,
    pub cec: Option<f64>,
    pub oc: Option<f64>,
}

/// Geocoding plus daily and forecast weather.
pub trait WeatherSource: Send + Sync {
    fn locate(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Coordinates, ProviderError>> + Send;

    /// Observed weather for past dates, forecast weather otherwise.
    fn day_weather(
        &self,
        at: Coordinates,
        date: NaiveDate,
        today: NaiveDate,
    ) -> impl Future<Output = Result<DayWeather, ProviderError>> + Send;

    fn forecast(
        &self,
        at: Coordinates,
        days: u32,
    ) -> impl Future<Output = Result<Vec<ForecastDay>, ProviderError>> + Send;
}

/// Daily surface shortwave radiation (SRAD).
pub trait SolarSource: Send + Sync {
    /// Raw daily series for `[start, end]`, keyed by date. Fill values are
    /// passed through untouched.
    fn daily_srad(
        &self,
        at: Coordinates,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<BTreeMap<NaiveDate, f64>, ProviderError>> + Send;
}

/// Satellite vegetation index and soil properties.
pub trait EarthSource: Send + Sync {
    /// Most recent low-cloud NDVI observation up to `date`, if any.
    fn latest_ndvi(
        &self,
        at: Coordinates,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Option<f64>, ProviderError>> + Send;

    fn soil(
        &self,
        at: Coordinates,
    ) -> impl Future<Output = Result<SoilProfile, ProviderError>> + Send;
}

/// Which weather endpoint answers for a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherLookup {
    /// Observed history for a past date.
    History(NaiveDate),
    /// Index into a 3-day forecast. Dates beyond the window use today.
    Forecast { index: usize },
}

impl WeatherLookup {
    pub const FORECAST_DAYS: u32 = 3;

    pub fn for_date(date: NaiveDate, today: NaiveDate) -> Self {
        let days_ahead = (date - today).num_days();
        if days_ahead < 0 {
            WeatherLookup::History(date)
        } else if days_ahead < i64::from(Self::FORECAST_DAYS) {
            WeatherLookup::Forecast {
                index: days_ahead as usize,
            }
        } else {
            WeatherLookup::Forecast { index: 0 }
        }
    }
}
