//! Display name persistence.
//!
//! The display name lives in a small JSON document, `{"username": "..."}`,
//! by default under the platform config directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use veeton_app::IdentityStore;

/// Session file errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the file failed.
    #[error("session file {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The file exists but is not a session document.
    #[error("session file {path} is malformed: {source}")]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

/// [`IdentityStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    /// Store reading and writing `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/veeton/session.json`, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("veeton").join("session.json"))
    }

    /// File this store uses.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }
}

impl IdentityStore for FileIdentityStore {
    type Error = StoreError;

    fn load(&self) -> Result<Option<String>, Self::Error> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }

        let file: SessionFile = serde_json::from_str(&content)
            .map_err(|source| StoreError::Json { path: self.path.clone(), source })?;
        Ok(file.username.filter(|name| !name.is_empty()))
    }

    fn save(&mut self, username: &str) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let file = SessionFile { username: Some(username.to_owned()) };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|source| StoreError::Json { path: self.path.clone(), source })?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), "display name saved");
        Ok(())
    }
}
