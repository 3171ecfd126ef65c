use placement_core::error::CoreError;
use placement_core::types::DbId;

/// Errors returned by a [`ParticipationStore`](crate::store::ParticipationStore)
/// backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A row the operation depends on does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The write would create a row the active policy or a unique key forbids.
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// A stored value could not be interpreted (e.g. an unknown status).
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// A backend-specific failure (connection loss, aborted transaction).
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                StoreError::Duplicate(db_err.message().to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            StoreError::Duplicate(msg) => CoreError::Conflict(msg),
            StoreError::Corrupt(msg) | StoreError::Backend(msg) => CoreError::Internal(msg),
        }
    }
}

/// Stored enums are parsed back with `CoreError::Validation`; inside a store
/// that means the row itself is bad.
pub(crate) fn corrupt(err: CoreError) -> StoreError {
    StoreError::Corrupt(err.to_string())
}
