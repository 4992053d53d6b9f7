use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::{dispatching::UpdateHandler, prelude::*, types::UserId, utils::command::BotCommands};
use weather_core::{
    CityRegistry, Config, ReactionCatalog, Transcriber, WeatherService, provider_from_config,
};

use crate::{handlers, telegram};

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Поддерживаемые команды:")]
pub enum Command {
    #[command(description = "список городов")]
    Start,
    #[command(description = "упомянуть всех администраторов чата")]
    All,
    #[command(description = "показать эту справку")]
    Help,
}

/// Immutable state shared by every handler invocation.
#[derive(Debug)]
pub struct AppState {
    pub weather: WeatherService,
    pub reactions: ReactionCatalog,
    pub transcriber: Transcriber,
    pub bot_id: UserId,
}

impl AppState {
    pub fn new(config: &Config, bot_id: UserId) -> Self {
        let weather = WeatherService::new(
            Arc::new(CityRegistry::default()),
            Arc::from(provider_from_config(config)),
        );

        Self {
            weather,
            reactions: ReactionCatalog::default(),
            transcriber: Transcriber::from_config(config),
            bot_id,
        }
    }

    pub fn registry(&self) -> &CityRegistry {
        self.weather.registry()
    }
}

/// Build the update handler tree: commands, then voice/video notes, then plain text.
///
/// Edits and channel posts only ever reach the city handler.
pub fn schema() -> UpdateHandler<HandlerError> {
    let messages = Update::filter_message()
        .branch(dptree::entry().filter_command::<Command>().endpoint(handlers::command))
        .branch(
            dptree::filter_map(|msg: Message| telegram::media_of(&msg)).endpoint(handlers::media),
        )
        .branch(dptree::endpoint(handlers::text));

    dptree::entry()
        .branch(messages)
        .branch(Update::filter_edited_message().endpoint(handlers::text))
        .branch(Update::filter_channel_post().endpoint(handlers::text))
        .branch(Update::filter_edited_channel_post().endpoint(handlers::text))
}

/// Connect to Telegram and poll for updates until interrupted.
pub async fn run(token: String, config: Config) -> Result<()> {
    let bot = Bot::new(token);

    let me = bot.get_me().await.context("Failed to authenticate with Telegram")?;
    tracing::info!(id = me.id.0, username = ?me.username, "Starting bot");

    if !config.is_transcription_configured() {
        tracing::warn!(
            "No speech-to-text API key configured; voice messages will get an error reply"
        );
    }

    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::error!(error = %err, "Failed to register bot commands");
    }

    let state = Arc::new(AppState::new(&config, me.id));

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            tracing::trace!(update_id = ?upd.id, "Unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text("Error in update handler"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
