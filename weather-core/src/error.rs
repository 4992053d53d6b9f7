use thiserror::Error;

/// Failures of a weather lookup. `Display` is the text shown to the chat.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("Город не найден")]
    NotFound,

    #[error("Ошибка запроса")]
    Request,
}

/// Failures along the download → convert → recognize pipeline.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("failed to download media: {0:#}")]
    Download(anyhow::Error),

    #[error("audio conversion failed: {0}")]
    Conversion(String),

    #[error("speech was not recognized")]
    Unintelligible,

    #[error("speech recognition service error: {0}")]
    Service(String),

    #[error("local file error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscriptionError {
    /// Fixed reply sent to the chat for this failure.
    pub fn user_message(&self) -> String {
        match self {
            TranscriptionError::Download(_) | TranscriptionError::Io(_) => {
                "Не удалось загрузить файл.".to_string()
            }
            TranscriptionError::Conversion(_) => "Не удалось обработать аудиофайл.".to_string(),
            TranscriptionError::Unintelligible => "Не удалось распознать речь.".to_string(),
            TranscriptionError::Service(cause) => {
                format!("Ошибка сервиса распознавания речи: {cause}")
            }
        }
    }
}

/// The chat platform refused to list administrators.
#[derive(Debug, Error)]
#[error("failed to enumerate chat administrators: {0:#}")]
pub struct AdminEnumerationError(#[from] pub anyhow::Error);
