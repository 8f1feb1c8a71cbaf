use crate::{
    Config, LookupInput, WeatherResult, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// A structurally valid provider answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderReply {
    Found(WeatherResult),
    /// The payload carried a non-success status code.
    NotFound { code: String, message: Option<String> },
}

/// The request never produced an interpretable answer.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to reach weather provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse weather provider response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Weather provider response is missing {0}")]
    MissingField(&'static str),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Perform exactly one request for `input`. No retries.
    async fn fetch(&self, input: &LookupInput) -> Result<ProviderReply, FetchError>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    if config.api_key.is_none() {
        tracing::warn!(
            "No API key configured; requests will be sent without one. \
             Set {} or run `weathernow configure`.",
            crate::config::API_KEY_ENV
        );
    }

    let provider = match &config.endpoint {
        Some(endpoint) => OpenWeatherProvider::with_endpoint(config.api_key(), endpoint),
        None => OpenWeatherProvider::new(config.api_key()),
    };

    Box::new(provider)
}
