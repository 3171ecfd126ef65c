use crate::types::DbId;

/// Domain error taxonomy shared by the tracker, the repositories and the
/// HTTP layer.
///
/// `Validation`, `Unauthorized` and `Forbidden` are never retry-worthy;
/// `Internal` wraps persistence failures the caller may resubmit after.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether the caller may sensibly resubmit the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Internal(_) | CoreError::NotFound { .. })
    }
}
