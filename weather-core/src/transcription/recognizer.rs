use async_trait::async_trait;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;

use crate::error::TranscriptionError;

use super::SpeechRecognizer;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
pub const DEFAULT_MODEL: &str = "whisper-1";

/// Speech-to-text over an OpenAI-compatible `audio/transcriptions` endpoint.
#[derive(Clone)]
pub struct HttpSpeechRecognizer {
    api_url: String,
    api_key: Option<String>,
    model: String,
    http: Client,
}

impl std::fmt::Debug for HttpSpeechRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSpeechRecognizer")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

impl HttpSpeechRecognizer {
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_key,
            model: model.into(),
            http: Client::new(),
        }
    }

    fn api_key(&self) -> Result<&str, TranscriptionError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| TranscriptionError::Service("API key is not configured".into()))
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl SpeechRecognizer for HttpSpeechRecognizer {
    fn check_ready(&self) -> Result<(), TranscriptionError> {
        self.api_key().map(|_| ())
    }

    async fn recognize(
        &self,
        audio: Vec<u8>,
        language: &str,
    ) -> Result<String, TranscriptionError> {
        let api_key = self.api_key()?;

        let file = Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::Service(e.to_string()))?;
        let form = Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("language", language.to_string());

        let res = self
            .http
            .post(&self.api_url)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Service(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| TranscriptionError::Service(e.to_string()))?;

        if !status.is_success() {
            return Err(TranscriptionError::Service(format!("status {status}")));
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&body)
            .map_err(|e| TranscriptionError::Service(format!("unexpected response: {e}")))?;

        let text = parsed.text.trim();
        if text.is_empty() {
            return Err(TranscriptionError::Unintelligible);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn recognizer(server: &mockito::ServerGuard) -> HttpSpeechRecognizer {
        HttpSpeechRecognizer::new(
            format!("{}/v1/audio/transcriptions", server.url()),
            Some("secret".into()),
            DEFAULT_MODEL,
        )
    }

    #[tokio::test]
    async fn returns_trimmed_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/audio/transcriptions")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::Regex("name=\"language\"\r\n\r\nru".into()))
            .with_status(200)
            .with_body(r#"{"text":"  привет мир "}"#)
            .create_async()
            .await;

        let text = recognizer(&server)
            .recognize(b"RIFF".to_vec(), "ru")
            .await
            .expect("recognized");

        mock.assert_async().await;
        assert_eq!(text, "привет мир");
    }

    #[tokio::test]
    async fn empty_text_is_unintelligible() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"text":""}"#)
            .create_async()
            .await;

        let err = recognizer(&server).recognize(Vec::new(), "ru").await.unwrap_err();

        assert!(matches!(err, TranscriptionError::Unintelligible));
    }

    #[tokio::test]
    async fn error_status_is_a_service_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = recognizer(&server).recognize(Vec::new(), "ru").await.unwrap_err();

        match err {
            TranscriptionError::Service(cause) => assert!(cause.contains("503")),
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let recognizer = HttpSpeechRecognizer::new("http://127.0.0.1:9", None, DEFAULT_MODEL);

        let err = recognizer.recognize(Vec::new(), "ru").await.unwrap_err();

        assert!(matches!(err, TranscriptionError::Service(_)));
        assert!(recognizer.check_ready().is_err());
    }

    #[test]
    fn configured_key_is_ready() {
        let recognizer =
            HttpSpeechRecognizer::new(DEFAULT_API_URL, Some("secret".into()), DEFAULT_MODEL);

        assert!(recognizer.check_ready().is_ok());
    }

    #[test]
    fn debug_hides_api_key() {
        let recognizer =
            HttpSpeechRecognizer::new(DEFAULT_API_URL, Some("secret".into()), DEFAULT_MODEL);

        assert!(!format!("{recognizer:?}").contains("secret"));
    }
}
