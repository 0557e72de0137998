//! weatherapi.com client
//!
//! # Example
//! ```rust
//! use paddy_weatherapi::Client;
//!
//! let client = Client::builder().api_key(std::env::var("WEATHERAPI_KEY").ok()).build()?;
//! let at = client.search("Alor Setar").await?;
//! ```
use std::time::Duration;

use paddy::error::{ClientBuilderError, ProviderError};
use serde::de::DeserializeOwned;
use url::Url;

use crate::convert::{ApiErrorResponse, ApiResponse};

// ---------- Main Client ----------

const WEATHERAPI_BASE_URL: &str = "http://api.weatherapi.com/v1/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ClientBuilder<'a> {
    base_url: &'a str,
    api_key: Option<String>,
    timeout: Duration,
    http_client: Option<reqwest::Client>,
}

impl<'a> ClientBuilder<'a> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            base_url: WEATHERAPI_BASE_URL,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            http_client: None,
        }
    }

    pub fn base_url(mut self, base_url: &'a str) -> Self {
        self.base_url = base_url;
        self
    }

    /// Without a key every call fails with [`ProviderError::MissingApiKey`].
    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn custom_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<Client, ClientBuilderError> {
        let http_client = if let Some(http_client) = self.http_client {
            http_client
        } else {
            reqwest::Client::builder().build()?
        };

        Ok(Client {
            base_url: parse_base(self.base_url)?,
            api_key: self.api_key,
            timeout: self.timeout,
            http_client,
        })
    }
}

/// Joins only work against a base ending in `/`.
pub(crate) fn parse_base(base_url: &str) -> Result<Url, ClientBuilderError> {
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Url::parse(&base).map_err(|_| ClientBuilderError::InvalidProperty("base_url"))
}

#[derive(Clone, Debug)]
pub struct Client {
    base_url: Url,
    api_key: Option<String>,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl Client {
    pub fn builder<'a>() -> ClientBuilder<'a> {
        ClientBuilder::new()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub(crate) fn get(&self, path: &str) -> Result<reqwest::RequestBuilder, ProviderError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey("weatherapi"))?;
        let url = self.base_url.join(path)?;
        Ok(self
            .http_client
            .get(url)
            .timeout(self.timeout)
            .query(&[("key", key)]))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let response = self.get(path)?.query(query).send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(target: "paddy::weatherapi", %status, path, "weatherapi response");

        if status.is_success() {
            match serde_json::from_str::<ApiResponse<T>>(&text)? {
                ApiResponse::Ok(body) => Ok(body),
                ApiResponse::Err(err) => Err(err.into()),
            }
        } else {
            match serde_json::from_str::<ApiErrorResponse>(&text) {
                Ok(err) => Err(err.into()),
                Err(_) => Err(ProviderError::ProviderError(format!("{status}: {text}"))),
            }
        }
    }
}

impl From<ApiErrorResponse> for ProviderError {
    fn from(err: ApiErrorResponse) -> Self {
        match err.error.code {
            Some(code) => ProviderError::ProviderError(format!("{} ({code})", err.error.message)),
            None => ProviderError::ProviderError(err.error.message),
        }
    }
}
