use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;

use crate::{model::Forecast, registry::Coordinates};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the provider at another endpoint (self-hosted instance, test server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn forecast(&self, coords: Coordinates) -> Result<Forecast> {
        let latitude = coords.latitude.to_string();
        let longitude = coords.longitude.to_string();

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
                ("daily", DAILY_FIELDS),
                ("timezone", "auto"),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: Forecast =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo forecast JSON")?;

        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
