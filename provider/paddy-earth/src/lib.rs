//! Earth-observation data for a field: topsoil chemistry from SoilGrids and
//! the latest cloud-free Sentinel-2 NDVI from a point service.

pub mod client;
pub mod ndvi;
pub mod soil;

pub use client::{Client, ClientBuilder};
