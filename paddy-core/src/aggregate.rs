//! Merges the external providers into one feature record.
//!
//! Every provider call is independent and may fail. A failure is logged and
//! replaced by a fixed default, so gathering never fails as a whole.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::feature::FeatureVector;
use crate::sources::{
    Coordinates, DayWeather, EarthSource, ForecastDay, SoilProfile, SolarSource, WeatherLookup,
    WeatherSource,
};

pub const DEFAULT_NDVI: f64 = 0.65;
pub const DEFAULT_SOIL: SoilDefaults = SoilDefaults {
    ph: 5.5,
    cec: 12.0,
    oc: 1.5,
};
pub const DEFAULT_WEATHER: DayWeather = DayWeather {
    tmin: 24.0,
    tmax: 32.0,
    rain: 0.0,
};
pub const DEFAULT_SRAD: f64 = 4.5;

/// POWER marks missing days with -999.
const SRAD_FILL_THRESHOLD: f64 = -90.0;

pub const SRAD_HISTORY_DAYS: u64 = 365;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilDefaults {
    pub ph: f64,
    pub cec: f64,
    pub oc: f64,
}

/// Soil values measured by the farmer; these win over satellite estimates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilOverrides {
    pub ph: Option<f64>,
    pub cec: Option<f64>,
    pub oc: Option<f64>,
}

/// Monthly mean SRAD for charts plus the raw daily values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SradHistory {
    pub dates: Vec<String>,
    pub values: Vec<f64>,
    pub daily_values: Vec<f64>,
}

impl SradHistory {
    pub fn from_daily(series: &BTreeMap<NaiveDate, f64>) -> Self {
        let mut history = SradHistory::default();
        let mut months: BTreeMap<(i32, u32), (f64, u32)> = BTreeMap::new();
        for (day, value) in series {
            if !is_valid_srad(*value) {
                continue;
            }
            history.daily_values.push(*value);
            let slot = months.entry((day.year(), day.month())).or_default();
            slot.0 += value;
            slot.1 += 1;
        }
        for ((year, month), (sum, count)) in months {
            history.dates.push(format!("{year:04}-{month:02}"));
            history.values.push(sum / f64::from(count));
        }
        history
    }

    pub fn mean(&self) -> Option<f64> {
        if self.daily_values.is_empty() {
            None
        } else {
            Some(self.daily_values.iter().sum::<f64>() / self.daily_values.len() as f64)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutlook {
    pub label: String,
    #[serde(flatten)]
    pub day: ForecastDay,
}

/// "Today", "Tomorrow", or the weekday name.
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(date) {
        "Tomorrow".to_string()
    } else {
        date.format("%A").to_string()
    }
}

fn is_valid_srad(value: f64) -> bool {
    value > SRAD_FILL_THRESHOLD
}

pub struct FieldDataAggregator<W, S, E> {
    pub weather: W,
    pub solar: S,
    pub earth: E,
}

impl<W, S, E> FieldDataAggregator<W, S, E>
where
    W: WeatherSource,
    S: SolarSource,
    E: EarthSource,
{
    pub fn new(weather: W, solar: S, earth: E) -> Self {
        Self {
            weather,
            solar,
            earth,
        }
    }

    /// Gathers every raw input for a field on its planting date.
    pub async fn gather(
        &self,
        at: Coordinates,
        planting_date: NaiveDate,
        overrides: SoilOverrides,
        today: NaiveDate,
    ) -> FeatureVector {
        let (weather, srad, ndvi, soil) = futures::join!(
            self.day_weather(at, planting_date, today),
            self.single_day_srad(at, planting_date, today),
            self.ndvi(at, planting_date),
            self.soil(at),
        );

        FeatureVector {
            ndvi,
            tmin: weather.tmin,
            tmax: weather.tmax,
            rain: weather.rain,
            srad,
            soil_ph: overrides.ph.or(soil.ph).unwrap_or(DEFAULT_SOIL.ph),
            soil_cec: overrides.cec.or(soil.cec).unwrap_or(DEFAULT_SOIL.cec),
            soil_oc: overrides.oc.or(soil.oc).unwrap_or(DEFAULT_SOIL.oc),
        }
    }

    async fn day_weather(&self, at: Coordinates, date: NaiveDate, today: NaiveDate) -> DayWeather {
        match self.weather.day_weather(at, date, today).await {
            Ok(weather) => weather,
            Err(e) => {
                tracing::warn!(error = %e, %date, "weather lookup failed, using defaults");
                DEFAULT_WEATHER
            }
        }
    }

    async fn ndvi(&self, at: Coordinates, date: NaiveDate) -> f64 {
        match self.earth.latest_ndvi(at, date).await {
            Ok(Some(ndvi)) => ndvi,
            Ok(None) => {
                tracing::info!(%date, "no recent cloud-free NDVI, using default");
                DEFAULT_NDVI
            }
            Err(e) => {
                tracing::warn!(error = %e, "NDVI lookup failed, using default");
                DEFAULT_NDVI
            }
        }
    }

    async fn soil(&self, at: Coordinates) -> SoilProfile {
        self.earth.soil(at).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "soil lookup failed, using defaults");
            SoilProfile::default()
        })
    }

    /// SRAD for one day, falling back to the trailing yearly mean.
    pub async fn single_day_srad(&self, at: Coordinates, date: NaiveDate, today: NaiveDate) -> f64 {
        match self.solar.daily_srad(at, date, date).await {
            Ok(series) => {
                if let Some(value) = series.get(&date).copied().filter(|v| is_valid_srad(*v)) {
                    return value;
                }
                tracing::info!(%date, "SRAD missing for day, using yearly mean");
            }
            Err(e) => tracing::warn!(error = %e, %date, "SRAD lookup failed, using yearly mean"),
        }
        self.average_srad(at, today).await
    }

    pub async fn average_srad(&self, at: Coordinates, today: NaiveDate) -> f64 {
        self.srad_history(at, today).await.mean().unwrap_or(DEFAULT_SRAD)
    }

    /// Daily SRAD for the year ending yesterday, grouped into monthly means.
    pub async fn srad_history(&self, at: Coordinates, today: NaiveDate) -> SradHistory {
        let end = today.pred_opt().unwrap_or(today);
        let start = end
            .checked_sub_days(Days::new(SRAD_HISTORY_DAYS - 1))
            .unwrap_or(end);
        match self.solar.daily_srad(at, start, end).await {
            Ok(series) => SradHistory::from_daily(&series),
            Err(e) => {
                tracing::warn!(error = %e, "SRAD history lookup failed");
                SradHistory::default()
            }
        }
    }

    /// Three-day outlook for the dashboard; empty when weather is unavailable.
    pub async fn forecast_outlook(
        &self,
        at: Coordinates,
        today: NaiveDate,
    ) -> Vec<ForecastOutlook> {
        match self.weather.forecast(at, WeatherLookup::FORECAST_DAYS).await {
            Ok(days) => days
                .into_iter()
                .map(|day| ForecastOutlook {
                    label: day_label(day.date, today),
                    day,
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "forecast lookup failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const AT: Coordinates = Coordinates { lat: 6.12, lon: 100.37 };

    struct Down;

    impl WeatherSource for Down {
        async fn locate(&self, query: &str) -> Result<Coordinates, ProviderError> {
            Err(ProviderError::NotFound(query.to_string()))
        }
        async fn day_weather(
            &self,
            _at: Coordinates,
            _date: NaiveDate,
            _today: NaiveDate,
        ) -> Result<DayWeather, ProviderError> {
            Err(ProviderError::MissingApiKey("weather"))
        }
        async fn forecast(
            &self,
            _at: Coordinates,
            _days: u32,
        ) -> Result<Vec<ForecastDay>, ProviderError> {
            Err(ProviderError::MissingApiKey("weather"))
        }
    }

    impl SolarSource for Down {
        async fn daily_srad(
            &self,
            _at: Coordinates,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<BTreeMap<NaiveDate, f64>, ProviderError> {
            Err(ProviderError::ProviderError("503".into()))
        }
    }

    impl EarthSource for Down {
        async fn latest_ndvi(
            &self,
            _at: Coordinates,
            _date: NaiveDate,
        ) -> Result<Option<f64>, ProviderError> {
            Err(ProviderError::NotConfigured("ndvi"))
        }
        async fn soil(&self, _at: Coordinates) -> Result<SoilProfile, ProviderError> {
            Err(ProviderError::ProviderError("timeout".into()))
        }
    }

    struct Up;

    impl WeatherSource for Up {
        async fn locate(&self, _query: &str) -> Result<Coordinates, ProviderError> {
            Ok(AT)
        }
        async fn day_weather(
            &self,
            _at: Coordinates,
            _date: NaiveDate,
            _today: NaiveDate,
        ) -> Result<DayWeather, ProviderError> {
            Ok(DayWeather {
                tmin: 23.1,
                tmax: 33.4,
                rain: 12.0,
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
                    condition: "Patchy rain nearby".into(),
                    icon: "//cdn/176.png".into(),
                    temp_max: 33.0,
                    temp_min: 24.0,
                    rain: 3.2,
                })
                .collect())
        }
    }

    /// Fill value on the requested day; 5.0 everywhere else.
    impl SolarSource for Up {
        async fn daily_srad(
            &self,
            _at: Coordinates,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<BTreeMap<NaiveDate, f64>, ProviderError> {
            if start == end {
                return Ok(BTreeMap::from([(start, -999.0)]));
            }
            Ok(start
                .iter_days()
                .take_while(|d| *d <= end)
                .map(|d| (d, 5.0))
                .collect())
        }
    }

    impl EarthSource for Up {
        async fn latest_ndvi(
            &self,
            _at: Coordinates,
            _date: NaiveDate,
        ) -> Result<Option<f64>, ProviderError> {
            Ok(Some(0.72))
        }
        async fn soil(&self, _at: Coordinates) -> Result<SoilProfile, ProviderError> {
            Ok(SoilProfile {
                ph: Some(5.9),
                cec: Some(16.0),
                oc: None,
            })
        }
    }

    #[tokio::test]
    async fn all_failures_fall_back_to_defaults() {
        let agg = FieldDataAggregator::new(Down, Down, Down);
        let today = date("2024-06-10");
        let raw = agg.gather(AT, today, SoilOverrides::default(), today).await;
        assert_eq!(
            raw,
            FeatureVector {
                ndvi: DEFAULT_NDVI,
                tmin: 24.0,
                tmax: 32.0,
                rain: 0.0,
                srad: DEFAULT_SRAD,
                soil_ph: 5.5,
                soil_cec: 12.0,
                soil_oc: 1.5,
            }
        );
    }

    #[tokio::test]
    async fn merges_sources_and_prefers_farmer_soil() {
        let agg = FieldDataAggregator::new(Up, Up, Up);
        let today = date("2024-06-10");
        let overrides = SoilOverrides {
            ph: Some(6.4),
            ..Default::default()
        };
        let raw = agg.gather(AT, today, overrides, today).await;
        assert_eq!(raw.ndvi, 0.72);
        assert_eq!(raw.tmax, 33.4);
        assert_eq!(raw.rain, 12.0);
        // fill value on the day -> yearly mean of the history
        assert_eq!(raw.srad, 5.0);
        assert_eq!(raw.soil_ph, 6.4);
        assert_eq!(raw.soil_cec, 16.0);
        assert_eq!(raw.soil_oc, DEFAULT_SOIL.oc);
    }

    /// Sources that answer but have no cloud-free scene.
    struct Cloudy;

    impl EarthSource for Cloudy {
        async fn latest_ndvi(
            &self,
            _at: Coordinates,
            _date: NaiveDate,
        ) -> Result<Option<f64>, ProviderError> {
            Ok(None)
        }
        async fn soil(&self, at: Coordinates) -> Result<SoilProfile, ProviderError> {
            Up.soil(at).await
        }
    }

    #[tokio::test]
    async fn missing_scene_uses_default_ndvi() {
        let agg = FieldDataAggregator::new(Up, Up, Cloudy);
        let today = date("2024-06-10");
        let raw = agg.gather(AT, today, SoilOverrides::default(), today).await;
        assert_eq!(raw.ndvi, DEFAULT_NDVI);
        assert_eq!(raw.soil_ph, 5.9);
        assert_eq!(raw.tmax, 33.4);
    }

    #[tokio::test]
    async fn history_covers_the_year_before_today() {
        let agg = FieldDataAggregator::new(Up, Up, Up);
        let history = agg.srad_history(AT, date("2024-06-10")).await;
        assert_eq!(history.daily_values.len(), 365);
        assert_eq!(history.dates.first().map(String::as_str), Some("2023-06"));
        assert_eq!(history.dates.last().map(String::as_str), Some("2024-06"));
        assert!(history.values.iter().all(|v| *v == 5.0));
    }

    #[test]
    fn monthly_means_skip_fill_values() {
        let series = BTreeMap::from([
            (date("2024-01-30"), 4.0),
            (date("2024-01-31"), 6.0),
            (date("2024-02-01"), -999.0),
            (date("2024-02-02"), 3.0),
        ]);
        let history = SradHistory::from_daily(&series);
        assert_eq!(history.dates, vec!["2024-01", "2024-02"]);
        assert_eq!(history.values, vec![5.0, 3.0]);
        assert_eq!(history.daily_values.len(), 3);
        assert_eq!(history.mean(), Some(13.0 / 3.0));
    }

    #[tokio::test]
    async fn outlook_labels_days() {
        let agg = FieldDataAggregator::new(Up, Up, Up);
        let outlook = agg.forecast_outlook(AT, date("2024-06-10")).await;
        let labels: Vec<_> = outlook.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Today", "Tomorrow", "Wednesday"]);

        let down = FieldDataAggregator::new(Down, Down, Down);
        assert!(down.forecast_outlook(AT, date("2024-06-10")).await.is_empty());
    }
}
