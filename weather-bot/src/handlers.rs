use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ParseMode, ReplyParameters},
    utils::command::BotCommands,
};
use weather_core::{MediaRef, format_greeting, format_weather, mention_admins};

use crate::{
    bot::{AppState, Command, HandlerError},
    telegram::{ChatAdmins, TelegramMedia},
};

type HandlerResult = Result<(), HandlerError>;

pub async fn command(bot: Bot, msg: Message, cmd: Command, state: Arc<AppState>) -> HandlerResult {
    tracing::info!(chat_id = msg.chat.id.0, command = ?cmd, "Command received");

    match cmd {
        Command::Start => reply_html(&bot, &msg, format_greeting(state.registry())).await,
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
            Ok(())
        }
        Command::All => {
            let directory = ChatAdmins::new(bot.clone(), msg.chat.id);
            let text = mention_admins(&directory, state.bot_id.0).await;
            if text.is_empty() {
                tracing::info!(chat_id = msg.chat.id.0, "No administrators to mention");
                return Ok(());
            }
            reply_html(&bot, &msg, text).await
        }
    }
}

pub async fn media(bot: Bot, msg: Message, media: MediaRef, state: Arc<AppState>) -> HandlerResult {
    tracing::info!(
        chat_id = msg.chat.id.0,
        kind = %media.kind,
        message_id = media.message_id,
        "Transcription requested"
    );

    let source = TelegramMedia::new(bot.clone());
    let text = state.transcriber.transcribe(&source, &media).await;

    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

/// Plain text: answer with the weather when it names a known city, otherwise stay silent.
pub async fn text(bot: Bot, msg: Message, state: Arc<AppState>) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if !state.registry().contains(text) {
        tracing::debug!(chat_id = msg.chat.id.0, "Text is not a known city");
        return Ok(());
    }

    tracing::info!(chat_id = msg.chat.id.0, city = %text.trim(), "Weather requested");

    let result = state.weather.fetch(text).await;
    let reply = format_weather(&result, &state.reactions, &mut rand::thread_rng());

    reply_html(&bot, &msg, reply).await
}

async fn reply_html(bot: &Bot, msg: &Message, text: String) -> HandlerResult {
    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}
