use std::time::Duration;

use chrono::NaiveDate;
use paddy::error::{ClientBuilderError, ProviderError};
use paddy::sources::{Coordinates, EarthSource, SoilProfile};
use url::Url;

const SOILGRIDS_BASE_URL: &str = "https://rest.isric.org/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ClientBuilder<'a> {
    soilgrids_base_url: &'a str,
    ndvi_base_url: Option<&'a str>,
    timeout: Duration,
    http_client: Option<reqwest::Client>,
}

impl<'a> ClientBuilder<'a> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            soilgrids_base_url: SOILGRIDS_BASE_URL,
            ndvi_base_url: None,
            timeout: DEFAULT_TIMEOUT,
            http_client: None,
        }
    }

    pub fn soilgrids_base_url(mut self, base_url: &'a str) -> Self {
        self.soilgrids_base_url = base_url;
        self
    }

    /// NDVI lookups fail with [`ProviderError::NotConfigured`] until this is set.
    pub fn ndvi_base_url(mut self, base_url: Option<&'a str>) -> Self {
        self.ndvi_base_url = base_url.filter(|u| !u.trim().is_empty());
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
            soilgrids_base_url: parse_base(self.soilgrids_base_url, "soilgrids_base_url")?,
            ndvi_base_url: self
                .ndvi_base_url
                .map(|u| parse_base(u, "ndvi_base_url"))
                .transpose()?,
            timeout: self.timeout,
            http_client,
        })
    }
}

fn parse_base(base_url: &str, property: &'static str) -> Result<Url, ClientBuilderError> {
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Url::parse(&base).map_err(|_| ClientBuilderError::InvalidProperty(property))
}

#[derive(Clone, Debug)]
pub struct Client {
    soilgrids_base_url: Url,
    ndvi_base_url: Option<Url>,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl Client {
    pub fn builder<'a>() -> ClientBuilder<'a> {
        ClientBuilder::new()
    }

    pub(crate) fn soilgrids(&self, path: &str) -> Result<reqwest::RequestBuilder, ProviderError> {
        let url = self.soilgrids_base_url.join(path)?;
        Ok(self.http_client.get(url).timeout(self.timeout))
    }

    pub(crate) fn ndvi_service(
        &self,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, ProviderError> {
        let base = self
            .ndvi_base_url
            .as_ref()
            .ok_or(ProviderError::NotConfigured("ndvi service"))?;
        Ok(self.http_client.get(base.join(path)?).timeout(self.timeout))
    }

    pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ProviderError(format!(
                "{status}: {}",
                response.text().await?
            )));
        }
        Ok(serde_json::from_slice(&response.bytes().await?)?)
    }
}

impl EarthSource for Client {
    async fn latest_ndvi(
        &self,
        at: Coordinates,
        date: NaiveDate,
    ) -> Result<Option<f64>, ProviderError> {
        let reading = self.ndvi_reading(at, date).await?;
        if let (Some(ndvi), Some(acquired)) = (reading.ndvi, reading.acquired) {
            tracing::debug!(target: "paddy::earth", ndvi, %acquired, "ndvi observation");
        }
        Ok(reading.ndvi)
    }

    async fn soil(&self, at: Coordinates) -> Result<SoilProfile, ProviderError> {
        self.topsoil(at).await
    }
}
