//! Writes a finished collaboration to disk as pretty-printed JSON.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::engine::CollaborationResult;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Save `result` to `path`, creating parent directories as needed.
///
/// An existing file is overwritten. Returns the path written.
pub fn save_result(result: &CollaborationResult, path: impl AsRef<Path>) -> Result<PathBuf, PersistError> {
    let path = path.as_ref().to_path_buf();
    let json = serde_json::to_string_pretty(result)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| PersistError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(&path, json).map_err(|source| PersistError::Io {
        path: path.clone(),
        source,
    })?;

    debug!(path = %path.display(), turns = result.transcript.len(), "Result saved");
    Ok(path)
}

/// Read a previously saved result.
pub fn load_result(path: impl AsRef<Path>) -> Result<CollaborationResult, PersistError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
