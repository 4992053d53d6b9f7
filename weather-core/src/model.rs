use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::WeatherError;

/// Outcome of a weather lookup: parsed forecast body or a user-facing reason.
pub type WeatherResult = Result<Forecast, WeatherError>;

/// Forecast body as returned by the weather API.
///
/// Values stay JSON numbers so they are echoed back exactly as the API sent them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub current_weather: Option<CurrentWeather>,
    #[serde(default)]
    pub daily: Option<DailyForecast>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: Number,
    pub windspeed: Number,
}

impl CurrentWeather {
    pub fn temperature_c(&self) -> f64 {
        self.temperature.as_f64().unwrap_or_default()
    }

    pub fn wind_speed(&self) -> f64 {
        self.windspeed.as_f64().unwrap_or_default()
    }
}

/// Column-oriented daily series; entries at the same index belong to the same day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<Number>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<Number>>,
    #[serde(default)]
    pub precipitation_sum: Vec<Option<Number>>,
}

/// One row of the daily forecast.
#[derive(Debug, Clone, Copy)]
pub struct DailyEntry<'a> {
    pub date: &'a str,
    pub temp_max: Option<&'a Number>,
    pub temp_min: Option<&'a Number>,
    pub precipitation: Option<&'a Number>,
}

impl DailyForecast {
    /// Rows in source order, stopping at the shortest column.
    pub fn entries(&self) -> impl Iterator<Item = DailyEntry<'_>> {
        self.time
            .iter()
            .zip(&self.temperature_2m_max)
            .zip(&self.temperature_2m_min)
            .zip(&self.precipitation_sum)
            .map(|(((date, max), min), rain)| DailyEntry {
                date: date.as_str(),
                temp_max: max.as_ref(),
                temp_min: min.as_ref(),
                precipitation: rain.as_ref(),
            })
    }
}
