use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::TranscriptionError;

use super::{AudioConverter, MediaKind};

/// Target sample rate expected by the recognizer.
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Converts Telegram media into mono 16 kHz WAV by running ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegConverter {
    program: PathBuf,
}

impl FfmpegConverter {
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(input: &Path, output: &Path, kind: MediaKind) -> Vec<OsString> {
        let mut args: Vec<OsString> =
            vec!["-y".into(), "-loglevel".into(), "error".into(), "-i".into(), input.into()];
        if kind == MediaKind::VideoNote {
            args.push("-vn".into());
        }
        args.extend([
            "-ac".into(),
            "1".into(),
            "-ar".into(),
            SAMPLE_RATE_HZ.to_string().into(),
            "-f".into(),
            "wav".into(),
            output.into(),
        ]);
        args
    }
}

#[async_trait]
impl AudioConverter for FfmpegConverter {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        kind: MediaKind,
    ) -> Result<(), TranscriptionError> {
        let program = self.program.display().to_string();
        tracing::debug!(
            %program,
            input = %input.display(),
            output = %output.display(),
            "Converting media"
        );

        let out = Command::new(&self.program)
            .args(Self::args(input, output, kind))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                TranscriptionError::Conversion(format!("failed to start {program}: {e}"))
            })?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let stderr = stderr.trim();
            tracing::warn!(
                %program,
                status = %out.status,
                stderr,
                "Converter exited with non-zero status"
            );
            return Err(TranscriptionError::Conversion(format!(
                "{program} exited with {}",
                out.status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn video_notes_drop_the_video_stream() {
        let args = strings(&FfmpegConverter::args(
            Path::new("in.mp4"),
            Path::new("out.wav"),
            MediaKind::VideoNote,
        ));

        assert!(args.contains(&"-vn".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("out.wav"));
    }

    #[test]
    fn voice_is_resampled_to_mono_16k() {
        let args = strings(&FfmpegConverter::args(
            Path::new("in.ogg"),
            Path::new("out.wav"),
            MediaKind::Voice,
        ));

        assert!(!args.contains(&"-vn".to_string()));
        let joined = args.join(" ");
        assert!(joined.contains("-i in.ogg"));
        assert!(joined.contains("-ac 1 -ar 16000 -f wav out.wav"));
    }

    #[tokio::test]
    async fn missing_binary_is_a_conversion_error() {
        let converter = FfmpegConverter::with_program("/definitely/not/here/ffmpeg");
        let err = converter
            .convert(Path::new("in.ogg"), Path::new("out.wav"), MediaKind::Voice)
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptionError::Conversion(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_a_conversion_error() {
        let converter = FfmpegConverter::with_program("false");
        let err = converter
            .convert(Path::new("in.ogg"), Path::new("out.wav"), MediaKind::Voice)
            .await
            .unwrap_err();

        match err {
            TranscriptionError::Conversion(msg) => assert!(msg.contains("exited with")),
            other => panic!("expected conversion error, got {other:?}"),
        }
    }
}
