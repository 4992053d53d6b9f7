use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use weather_core::{
    CityRegistry, Config, ReactionCatalog, WeatherService, format_weather, provider_from_config,
};

use crate::bot;

/// Environment variable holding the Telegram bot token.
pub const TOKEN_ENV: &str = "TOKEN_BOT_TELEGRAM";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-bot", version, about = "Telegram weather bot")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the bot and poll Telegram for updates (the default).
    Run {
        /// Bot token; read from TOKEN_BOT_TELEGRAM when omitted.
        #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
        token: String,
    },

    /// Print the weather reply for a city without going through Telegram.
    Show {
        /// City name, e.g. "Москва".
        city: String,
    },

    /// List the cities the bot knows about.
    Cities,

    /// Interactively set transcription options and save them to the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = self.config_for(|key| std::env::var(key).ok())?;

        match self.command {
            Some(Command::Run { token }) => bot::run(token, config).await,
            None => {
                let token = std::env::var(TOKEN_ENV)
                    .with_context(|| format!("{TOKEN_ENV} is not set"))?;
                bot::run(token, config).await
            }
            Some(Command::Show { city }) => {
                let service = WeatherService::new(
                    Arc::new(CityRegistry::default()),
                    Arc::from(provider_from_config(&config)),
                );
                let result = service.fetch(&city).await;
                let text =
                    format_weather(&result, &ReactionCatalog::default(), &mut rand::thread_rng());
                println!("{text}");
                Ok(())
            }
            Some(Command::Cities) => {
                for name in CityRegistry::default().names() {
                    println!("{name}");
                }
                Ok(())
            }
            Some(Command::Configure) => configure(config, self.config),
        }
    }

    /// Config the subcommand works with. `configure` writes its result back to disk,
    /// so it sees only what the file holds; everything else sees environment overrides too.
    fn config_for(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let config = self.load_file_config()?;
        match self.command {
            Some(Command::Configure) => Ok(config),
            _ => Ok(config.with_overrides(lookup)),
        }
    }

    fn load_file_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

fn configure(mut config: Config, path: Option<PathBuf>) -> Result<()> {
    let settings = &mut config.transcription;

    let api_key = inquire::Password::new("Speech-to-text API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current value")
        .prompt()?;
    if !api_key.trim().is_empty() {
        settings.api_key = Some(api_key.trim().to_string());
    }

    let api_url = inquire::Text::new("Speech-to-text endpoint:")
        .with_default(settings.api_url())
        .prompt()?;
    settings.api_url = Some(api_url);

    let language = inquire::Text::new("Recognition language:")
        .with_default(settings.language())
        .prompt()?;
    settings.language = Some(language);

    let ffmpeg = inquire::Text::new("ffmpeg executable:")
        .with_default(&settings.ffmpeg_program().display().to_string())
        .prompt()?;
    settings.ffmpeg = Some(PathBuf::from(ffmpeg));

    match path {
        Some(path) => {
            config.save_to(&path)?;
            println!("Saved configuration to {}", path.display());
        }
        None => {
            config.save()?;
            println!("Saved configuration to {}", Config::config_file_path()?.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["weather-bot"]).expect("parses");

        assert!(cli.command.is_none());
    }

    #[test]
    fn show_takes_a_city() {
        let cli = Cli::try_parse_from(["weather-bot", "show", "Москва"]).expect("parses");

        match cli.command {
            Some(Command::Show { city }) => assert_eq!(city, "Москва"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn run_accepts_token_flag() {
        let cli =
            Cli::try_parse_from(["weather-bot", "run", "--token", "123:abc"]).expect("parses");

        match cli.command {
            Some(Command::Run { token }) => assert_eq!(token, "123:abc"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn stt_key_from_env(key: &str) -> Option<String> {
        (key == "STT_API_KEY").then(|| "sk-from-env".to_string())
    }

    #[test]
    fn configure_does_not_persist_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save_to(&path).unwrap();
        let path_arg = path.to_str().unwrap();

        let cli = Cli::try_parse_from(["weather-bot", "--config", path_arg, "configure"]).unwrap();
        let config = cli.config_for(stt_key_from_env).unwrap();
        assert!(config.transcription.api_key.is_none());

        config.save_to(&path).unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(!saved.contains("sk-from-env"), "env key leaked into {saved}");
    }

    #[test]
    fn show_sees_env_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path_arg = path.to_str().unwrap();

        let cli =
            Cli::try_parse_from(["weather-bot", "--config", path_arg, "show", "Москва"]).unwrap();
        let config = cli.config_for(stt_key_from_env).unwrap();

        assert_eq!(config.transcription.api_key.as_deref(), Some("sk-from-env"));
    }
}
