//! Core library for the weather Telegram bot.
//!
//! This crate defines:
//! - The static city registry and the weather fetcher on top of Open-Meteo
//! - Rendering of forecasts (with canned reactions) into chat messages
//! - Voice message / video note transcription with guaranteed cleanup
//! - Composition of the "mention all admins" reply
//! - Configuration handling
//!
//! Everything here is independent of the chat framework; `weather-bot` wires it to Telegram.

pub mod config;
pub mod error;
pub mod format;
pub mod mention;
pub mod model;
pub mod provider;
pub mod registry;
pub mod transcription;

pub use config::{Config, TranscriptionSettings, WeatherSettings};
pub use error::{AdminEnumerationError, TranscriptionError, WeatherError};
pub use format::{Bucket, PhrasePicker, ReactionCatalog, format_greeting, format_weather};
pub use mention::{AdminDirectory, ChatAdmin, compose_mentions, mention_admins};
pub use model::{CurrentWeather, DailyForecast, Forecast, WeatherResult};
pub use provider::{WeatherProvider, WeatherService, provider_from_config};
pub use registry::{CityRegistry, Coordinates};
pub use transcription::{MediaKind, MediaRef, MediaSource, Transcriber};
