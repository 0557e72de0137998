pub mod client;
pub mod convert;
pub mod weather;

pub use client::{Client, ClientBuilder};

/// Environment variable holding the weatherapi.com key.
pub const WEATHERAPI_KEY_ENV: &str = "WEATHERAPI_KEY";
