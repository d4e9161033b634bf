//! Error types for store access.
//!
//! Every variant carries the store name, path or chat id it failed on, so the
//! HTTP and CLI layers can log and report without extra context.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`ChatStoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown store name, or no chat row with the requested id.
    NotFound,
    /// Store file missing or not openable.
    StoreUnavailable,
    /// Payload column is not valid JSON.
    MalformedPayload,
    /// Any other SQLite failure.
    QueryFailure,
}

#[derive(Error, Debug)]
pub enum ChatStoreError {
    #[error("Unknown store: {name}")]
    UnknownStore { name: String },

    #[error("Chat not found: {id}")]
    ChatNotFound { id: String },

    #[error("Database file not found: {}", path.display())]
    StoreMissing { path: PathBuf },

    #[error("Cannot open database {}: {source}", path.display())]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Malformed payload in chat {id}: {source}")]
    MalformedPayload {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Query failed on {}: {source}", path.display())]
    QueryFailure {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
}

impl ChatStoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownStore { .. } | Self::ChatNotFound { .. } => ErrorKind::NotFound,
            Self::StoreMissing { .. } | Self::StoreOpen { .. } => ErrorKind::StoreUnavailable,
            Self::MalformedPayload { .. } => ErrorKind::MalformedPayload,
            Self::QueryFailure { .. } => ErrorKind::QueryFailure,
        }
    }

    /// Helper for `map_err` on rusqlite calls against `path`.
    pub(crate) fn query(path: impl Into<PathBuf>) -> impl FnOnce(rusqlite::Error) -> Self {
        let path = path.into();
        move |source| Self::QueryFailure { path, source }
    }
}

pub type Result<T> = std::result::Result<T, ChatStoreError>;
