//! Adapters from teloxide to the collaborator traits of `weather-core`.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use teloxide::{
    net::Download,
    prelude::*,
    types::{FileId, Message},
};
use tokio::io::AsyncWriteExt;
use weather_core::{
    AdminDirectory, AdminEnumerationError, ChatAdmin, MediaKind, MediaRef, MediaSource,
};

/// Downloads message attachments through the Bot API file endpoint.
pub struct TelegramMedia {
    bot: Bot,
}

impl TelegramMedia {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MediaSource for TelegramMedia {
    async fn download(&self, media: &MediaRef, dest: &Path) -> anyhow::Result<()> {
        let file = self
            .bot
            .get_file(FileId(media.file_id.clone()))
            .await
            .context("Failed to resolve Telegram file")?;

        let mut out = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("Failed to create {}", dest.display()))?;
        self.bot
            .download_file(&file.path, &mut out)
            .await
            .context("Failed to download Telegram file")?;
        out.flush().await?;

        tracing::debug!(
            kind = %media.kind,
            size = file.size,
            path = %dest.display(),
            "Downloaded media"
        );
        Ok(())
    }
}

/// Lists administrators of one chat.
pub struct ChatAdmins {
    bot: Bot,
    chat_id: ChatId,
}

impl ChatAdmins {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl AdminDirectory for ChatAdmins {
    async fn administrators(&self) -> Result<Vec<ChatAdmin>, AdminEnumerationError> {
        let members = self
            .bot
            .get_chat_administrators(self.chat_id)
            .await
            .map_err(|e| AdminEnumerationError(e.into()))?;

        Ok(members
            .into_iter()
            .map(|member| ChatAdmin {
                id: member.user.id.0,
                username: member.user.username,
                first_name: member.user.first_name,
            })
            .collect())
    }
}

/// Voice message or video note carried by `msg`, if any.
pub fn media_of(msg: &Message) -> Option<MediaRef> {
    let (kind, file_id) = if let Some(voice) = msg.voice() {
        (MediaKind::Voice, voice.file.id.0.clone())
    } else if let Some(note) = msg.video_note() {
        (MediaKind::VideoNote, note.file.id.0.clone())
    } else {
        return None;
    };

    Some(MediaRef {
        kind,
        file_id,
        message_id: msg.id.0,
    })
}
