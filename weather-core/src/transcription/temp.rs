use std::{
    io,
    path::{Path, PathBuf},
};

use uuid::Uuid;

/// Temporary media files owned by one transcription attempt.
///
/// Every path handed out is removed when the guard drops, whichever way the
/// attempt ends. Names carry a random component so two attempts for the same
/// message never share a file.
#[derive(Debug)]
pub struct TempFiles {
    dir: PathBuf,
    stem: String,
    paths: Vec<PathBuf>,
}

impl TempFiles {
    pub fn new(dir: impl Into<PathBuf>, prefix: &str) -> Self {
        Self {
            dir: dir.into(),
            stem: format!("{prefix}_{}", Uuid::new_v4().simple()),
            paths: Vec::new(),
        }
    }

    /// Reserve a file with the given extension and register it for cleanup.
    pub fn path(&mut self, extension: &str) -> PathBuf {
        let path = self.dir.join(format!("{}.{extension}", self.stem));
        if !self.paths.contains(&path) {
            self.paths.push(path.clone());
        }
        path
    }
}

impl Drop for TempFiles {
    fn drop(&mut self) {
        for path in &self.paths {
            if let Err(err) = remove_if_exists(path) {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Failed to delete temporary file"
                );
            }
        }
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
