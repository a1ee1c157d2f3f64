//! Error types for taskarena-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ArenaName;

/// All errors that can arise from arena registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying I/O failure, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (save path).
    #[error("registry JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Duplicate arena name on create. Nothing is created.
    #[error("arena '{name}' already exists")]
    ArenaExists { name: ArenaName },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.taskarena/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// All errors that can arise from a record store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parse error on load — includes file path and context from serde_json.
    #[error("failed to parse task store at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (save path).
    #[error("task store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The record being persisted is not present in this store.
    #[error("record {uuid} not found in store at {path}")]
    UnknownRecord { uuid: uuid::Uuid, path: PathBuf },
}

/// Convenience constructor for [`RegistryError::Io`].
pub(crate) fn registry_io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.into(),
        source,
    }
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn store_io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
