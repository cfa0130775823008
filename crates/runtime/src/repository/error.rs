//! Error types raised by repository implementations.

use raid_core::SessionId;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("repository lock was poisoned")]
    LockPoisoned,

    #[error("JSON error in {field}: {source}")]
    Json {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupted data for {session}: {reason}")]
    CorruptedData { session: SessionId, reason: String },

    #[error("record for {0} already exists")]
    AlreadyExists(SessionId),
}

impl RepositoryError {
    pub(crate) fn json(field: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| RepositoryError::Json { field, source }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
