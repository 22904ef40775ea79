use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chatmaze_core::error::StoreError;
use chatmaze_core::store::{SaveDocument, StateStore};

/// Save document persisted as pretty-printed JSON on disk.
///
/// A missing file loads as the empty document. Saves go to a sibling temp
/// file that is renamed over the target, so readers never see a torn write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `content` next to the target and return the temp path.
    fn write_temp(&self, content: &str) -> Result<PathBuf, StoreError> {
        let dir = self.path.parent().unwrap_or(Path::new("."));
        let base = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("chatmaze.json");

        let mut attempt = 0u32;
        loop {
            let candidate = dir.join(format!(".{base}.tmp-{}-{attempt}", std::process::id()));
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(mut file) => {
                    file.write_all(content.as_bytes())?;
                    file.sync_all()?;
                    return Ok(candidate);
                },
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    attempt = attempt.saturating_add(1);
                },
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<SaveDocument, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No save file found, starting empty");
                return Ok(SaveDocument::default());
            },
            Err(e) => return Err(e.into()),
        };
        let document = SaveDocument::from_json(&text)?;
        tracing::debug!(
            path = %self.path.display(),
            players = document.players.len(),
            "Loaded save file"
        );
        Ok(document)
    }

    fn save(&self, document: &SaveDocument) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }

        let content = document.to_json()?;
        let temp = self.write_temp(&content)?;
        if let Err(e) = std::fs::rename(&temp, &self.path) {
            let _ = std::fs::remove_file(&temp);
            return Err(e.into());
        }
        if let Some(dir) = self.path.parent()
            && let Ok(handle) = File::open(dir)
        {
            let _ = handle.sync_all();
        }

        tracing::debug!(
            path = %self.path.display(),
            players = document.players.len(),
            processed = document.processed_messages.len(),
            "Saved game state"
        );
        Ok(())
    }
}
