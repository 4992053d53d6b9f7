use crate::{
    Config, WeatherError, WeatherResult,
    model::Forecast,
    provider::open_meteo::OpenMeteoProvider,
    registry::{CityRegistry, Coordinates, normalize_city},
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod open_meteo;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn forecast(&self, coords: Coordinates) -> anyhow::Result<Forecast>;
}

/// Construct the weather provider described by config.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    match config.weather.base_url.as_deref() {
        Some(url) => Box::new(OpenMeteoProvider::with_base_url(url)),
        None => Box::new(OpenMeteoProvider::new()),
    }
}

/// Resolves city names against the registry and asks the provider for a forecast.
#[derive(Debug, Clone)]
pub struct WeatherService {
    registry: Arc<CityRegistry>,
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(registry: Arc<CityRegistry>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self { registry, provider }
    }

    pub fn registry(&self) -> &CityRegistry {
        &self.registry
    }

    /// Fetch the forecast for `city`.
    ///
    /// Unknown cities fail with [`WeatherError::NotFound`] before any request is made.
    /// Provider failures are logged with their cause and surface as [`WeatherError::Request`].
    pub async fn fetch(&self, city: &str) -> WeatherResult {
        let city = normalize_city(city);
        let coords = self.registry.lookup(&city).ok_or(WeatherError::NotFound)?;

        tracing::debug!(
            %city,
            lat = coords.latitude,
            lon = coords.longitude,
            "Requesting forecast"
        );

        self.provider.forecast(coords).await.map_err(|err| {
            tracing::error!(%city, error = %format!("{err:#}"), "Weather request failed");
            WeatherError::Request
        })
    }
}
