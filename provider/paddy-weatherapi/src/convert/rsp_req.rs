use chrono::NaiveDate;
use serde::Deserialize;

use paddy::sources::{Coordinates, DayWeather, ForecastDay};

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
}

impl From<&SearchHit> for Coordinates {
    fn from(hit: &SearchHit) -> Self {
        Coordinates::new(hit.lat, hit.lon)
    }
}

/// Shared shape of `forecast.json` and `history.json`.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub forecast: Forecast,
}

#[derive(Debug, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub forecastday: Vec<ForecastDayEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastDayEntry {
    pub date: NaiveDate,
    pub day: DaySummary,
}

#[derive(Debug, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    #[serde(default)]
    pub totalprecip_mm: f64,
    #[serde(default)]
    pub condition: Condition,
}

#[derive(Debug, Default, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub icon: String,
}

impl From<&DaySummary> for DayWeather {
    fn from(day: &DaySummary) -> Self {
        DayWeather {
            tmin: day.mintemp_c,
            tmax: day.maxtemp_c,
            rain: day.totalprecip_mm,
        }
    }
}

impl From<ForecastDayEntry> for ForecastDay {
    fn from(entry: ForecastDayEntry) -> Self {
        ForecastDay {
            date: entry.date,
            condition: entry.day.condition.text,
            icon: entry.day.condition.icon,
            temp_max: entry.day.maxtemp_c,
            temp_min: entry.day.mintemp_c,
            rain: entry.day.totalprecip_mm,
        }
    }
}
