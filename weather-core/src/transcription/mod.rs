//! Voice message and video note transcription.
//!
//! One attempt downloads the media, converts it to mono 16 kHz WAV and sends
//! the audio to a speech recognizer. Each step sits behind a trait so the bot
//! wires Telegram, ffmpeg and an HTTP service in, while tests plug in fakes.

use std::{
    fmt::Debug,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;

use crate::{Config, error::TranscriptionError};

pub mod ffmpeg;
pub mod recognizer;
pub mod temp;

pub use ffmpeg::FfmpegConverter;
pub use recognizer::HttpSpeechRecognizer;
pub use temp::TempFiles;

/// Kind of media a transcription was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Voice,
    VideoNote,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Voice => "voice",
            MediaKind::VideoNote => "video_note",
        }
    }

    /// Extension of the downloaded file.
    pub fn source_extension(&self) -> &'static str {
        match self {
            MediaKind::Voice => "ogg",
            MediaKind::VideoNote => "mp4",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote media attached to a chat message.
#[derive(Debug, Clone)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub file_id: String,
    pub message_id: i32,
}

#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Store the media's bytes at `dest`.
    async fn download(&self, media: &MediaRef, dest: &Path) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AudioConverter: Send + Sync + Debug {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        kind: MediaKind,
    ) -> Result<(), TranscriptionError>;
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync + Debug {
    /// Fails with `Service` when no request could succeed, e.g. without credentials.
    /// Checked before anything is downloaded.
    fn check_ready(&self) -> Result<(), TranscriptionError> {
        Ok(())
    }

    /// Turn WAV audio into text. Fails with `Unintelligible` or `Service`.
    async fn recognize(
        &self,
        audio: Vec<u8>,
        language: &str,
    ) -> Result<String, TranscriptionError>;
}

#[derive(Debug, Clone)]
pub struct Transcriber {
    converter: Arc<dyn AudioConverter>,
    recognizer: Arc<dyn SpeechRecognizer>,
    temp_dir: PathBuf,
    language: String,
}

impl Transcriber {
    pub fn new(
        converter: Arc<dyn AudioConverter>,
        recognizer: Arc<dyn SpeechRecognizer>,
        temp_dir: impl Into<PathBuf>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            converter,
            recognizer,
            temp_dir: temp_dir.into(),
            language: language.into(),
        }
    }

    /// ffmpeg + HTTP recognizer as described by the `[transcription]` config section.
    pub fn from_config(config: &Config) -> Self {
        let settings = &config.transcription;
        Self::new(
            Arc::new(FfmpegConverter::with_program(settings.ffmpeg_program())),
            Arc::new(HttpSpeechRecognizer::new(
                settings.api_url(),
                settings.api_key.clone(),
                settings.model(),
            )),
            settings.temp_dir(),
            settings.language(),
        )
    }

    /// Transcribe `media` and return the reply for the chat.
    ///
    /// Never fails: every error is logged and mapped to a fixed message.
    /// Temporary files are gone by the time this returns.
    pub async fn transcribe(&self, source: &dyn MediaSource, media: &MediaRef) -> String {
        match self.try_transcribe(source, media).await {
            Ok(text) => text,
            Err(err) => {
                match &err {
                    TranscriptionError::Unintelligible => {
                        tracing::info!(
                            kind = %media.kind,
                            message_id = media.message_id,
                            "Speech not recognized"
                        );
                    }
                    other => {
                        tracing::error!(
                            kind = %media.kind,
                            message_id = media.message_id,
                            error = %other,
                            "Transcription failed"
                        );
                    }
                }
                err.user_message()
            }
        }
    }

    async fn try_transcribe(
        &self,
        source: &dyn MediaSource,
        media: &MediaRef,
    ) -> Result<String, TranscriptionError> {
        self.recognizer.check_ready()?;

        let mut files = TempFiles::new(
            &self.temp_dir,
            &format!("{}_{}", media.kind, media.message_id),
        );
        let input = files.path(media.kind.source_extension());
        let output = files.path("wav");

        source
            .download(media, &input)
            .await
            .map_err(TranscriptionError::Download)?;

        self.converter.convert(&input, &output, media.kind).await?;

        let audio = tokio::fs::read(&output).await?;
        self.recognizer.recognize(audio, &self.language).await
    }
}
