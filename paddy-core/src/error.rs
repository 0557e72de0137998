use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientBuilderError {
    #[error("reqwest error: {0}")]
    HttpError(
        #[from]
        #[source]
        reqwest::Error,
    ),
    #[error("invalid property: {0}")]
    InvalidProperty(&'static str),
}

/// Failure talking to one of the external data providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("provider error: {0}")]
    ProviderError(String),
    #[error("missing api key for {0}")]
    MissingApiKey(&'static str),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("no result for {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("training data has no header row")]
    MissingHeader,
    #[error("training data is missing column `{0}`")]
    MissingColumn(String),
    #[error("training data has no usable rows")]
    Empty,
    #[error("normal equations are singular")]
    Singular,
}
