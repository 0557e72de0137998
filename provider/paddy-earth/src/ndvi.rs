use chrono::{Days, NaiveDate};
use paddy::error::ProviderError;
use paddy::sources::Coordinates;
use serde::Deserialize;

use crate::client::Client;

/// Days of imagery searched before the planting date.
pub const LOOKBACK_DAYS: u64 = 180;
/// Scenes cloudier than this percentage are ignored.
pub const MAX_CLOUD_PERCENT: u32 = 20;

/// Mean NDVI over a 50 m buffer around the point, from the most recent
/// qualifying Sentinel-2 scene.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NdviReading {
    pub ndvi: Option<f64>,
    #[serde(default)]
    pub acquired: Option<NaiveDate>,
}

impl Client {
    pub async fn ndvi_reading(
        &self,
        at: Coordinates,
        date: NaiveDate,
    ) -> Result<NdviReading, ProviderError> {
        let start = date.checked_sub_days(Days::new(LOOKBACK_DAYS)).unwrap_or(date);
        let response = self
            .ndvi_service("ndvi")?
            .query(&[
                ("lon", at.lon.to_string()),
                ("lat", at.lat.to_string()),
                ("start", start.format("%Y-%m-%d").to_string()),
                ("end", date.format("%Y-%m-%d").to_string()),
                ("max_cloud", MAX_CLOUD_PERCENT.to_string()),
            ])
            .send()
            .await?;
        Client::read_json(response).await
    }
}
