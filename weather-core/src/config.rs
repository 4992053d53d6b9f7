use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::transcription::recognizer::{DEFAULT_API_URL, DEFAULT_MODEL};

pub const DEFAULT_LANGUAGE: &str = "ru";

/// Weather API settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeatherSettings {
    /// Forecast endpoint; Open-Meteo when unset.
    pub base_url: Option<String>,
}

/// Voice/video-note transcription settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TranscriptionSettings {
    /// ffmpeg executable; looked up on `PATH` when unset.
    pub ffmpeg: Option<PathBuf>,
    /// Where downloaded and converted media live during a request.
    pub temp_dir: Option<PathBuf>,
    /// Language hint for the recognizer, e.g. "ru".
    pub language: Option<String>,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl TranscriptionSettings {
    pub fn ffmpeg_program(&self) -> PathBuf {
        self.ffmpeg.clone().unwrap_or_else(|| PathBuf::from("ffmpeg"))
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [weather]
/// base_url = "https://api.open-meteo.com/v1/forecast"
///
/// [transcription]
/// ffmpeg = "/usr/bin/ffmpeg"
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub weather: WeatherSettings,
    #[serde(default)]
    pub transcription: TranscriptionSettings,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-bot", "weather-bot")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay `STT_API_KEY`, `STT_API_URL` and `FFMPEG_PATH` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`; empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("STT_API_KEY") {
            self.transcription.api_key = Some(key);
        }
        if let Some(url) = get("STT_API_URL") {
            self.transcription.api_url = Some(url);
        }
        if let Some(path) = get("FFMPEG_PATH") {
            self.transcription.ffmpeg = Some(PathBuf::from(path));
        }
        self
    }

    pub fn is_transcription_configured(&self) -> bool {
        self.transcription.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_to_public_services() {
        let cfg = Config::default();

        assert!(cfg.weather.base_url.is_none());
        assert_eq!(cfg.transcription.language(), "ru");
        assert_eq!(cfg.transcription.api_url(), DEFAULT_API_URL);
        assert_eq!(cfg.transcription.ffmpeg_program(), PathBuf::from("ffmpeg"));
        assert!(!cfg.is_transcription_configured());
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");

        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_keep_sections() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.weather.base_url = Some("http://localhost:8080/v1/forecast".into());
        cfg.transcription.api_key = Some("KEY".into());
        cfg.transcription.language = Some("uk".into());
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.transcription.language(), "uk");
    }

    #[test]
    fn partial_file_parses() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[transcription]\nffmpeg = \"/opt/ffmpeg\"\n").expect("write");

        let cfg = Config::load_from(&path).expect("load");

        assert_eq!(cfg.transcription.ffmpeg_program(), PathBuf::from("/opt/ffmpeg"));
        assert!(cfg.weather.base_url.is_none());
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is = = not toml").expect("write");

        let err = Config::load_from(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("STT_API_KEY", "from-env"),
            ("FFMPEG_PATH", " "),
            ("STT_API_URL", "http://stt"),
        ]);

        let mut cfg = Config::default();
        cfg.transcription.ffmpeg = Some("/usr/bin/ffmpeg".into());
        let cfg = cfg.with_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.transcription.api_key.as_deref(), Some("from-env"));
        assert_eq!(cfg.transcription.api_url(), "http://stt");
        assert_eq!(cfg.transcription.ffmpeg_program(), PathBuf::from("/usr/bin/ffmpeg"));
    }
}
