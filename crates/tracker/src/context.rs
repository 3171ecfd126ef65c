//! Caller scope resolved once per request from the authenticated identity.
//!
//! The tracker never looks up "which batch does this caller belong to" on
//! its own; every operation receives the resolved scope explicitly.

use placement_core::error::CoreError;
use placement_core::roles;
use placement_core::types::DbId;

/// A student acting on their own participations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentContext {
    pub student_id: DbId,
    pub batch_id: DbId,
}

/// A representative acting on outcomes in their batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierContext {
    pub actor_id: DbId,
    pub role: String,
    pub batch_id: DbId,
}

impl VerifierContext {
    /// Fails with `Forbidden` unless the role may verify outcomes.
    pub fn ensure_can_verify(&self) -> Result<(), CoreError> {
        if roles::can_verify(&self.role) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Role '{}' cannot verify outcomes",
                self.role
            )))
        }
    }

    /// Fails with `Forbidden` unless `batch_id` is the verifier's batch.
    pub fn ensure_batch(&self, batch_id: DbId) -> Result<(), CoreError> {
        ensure_same_batch(self.batch_id, batch_id)
    }
}

impl StudentContext {
    /// Fails with `Forbidden` unless `batch_id` is the student's batch.
    pub fn ensure_batch(&self, batch_id: DbId) -> Result<(), CoreError> {
        ensure_same_batch(self.batch_id, batch_id)
    }
}

fn ensure_same_batch(caller: DbId, target: DbId) -> Result<(), CoreError> {
    if caller == target {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Resource belongs to a different batch".to_string(),
        ))
    }
}
