//! NASA POWER daily point API, limited to surface shortwave radiation
//! (`ALLSKY_SFC_SW_DWN`, kWh/m²/day).

pub mod client;

pub use client::{Client, ClientBuilder};

/// POWER parameter used as the model's `TotalSRAD`.
pub const SRAD_PARAMETER: &str = "ALLSKY_SFC_SW_DWN";
