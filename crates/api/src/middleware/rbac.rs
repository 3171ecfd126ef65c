//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`], rejects callers whose role does not
//! qualify, and resolves the caller's batch scope once so handlers receive
//! an explicit context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use placement_core::error::CoreError;
use placement_core::roles;
use placement_tracker::{StudentContext, VerifierContext};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a student role (`student` or `class_rep`) and a batch.
pub struct RequireStudent(pub StudentContext);

impl FromRequestParts<AppState> for RequireStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !roles::is_student(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Student role required".into(),
            )));
        }
        Ok(RequireStudent(user.student_context()?))
    }
}

/// Requires a verification-capable role and a batch.
///
/// ```ignore
/// async fn queue(RequireVerifier(ctx): RequireVerifier) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireVerifier(pub VerifierContext);

impl FromRequestParts<AppState> for RequireVerifier {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !roles::can_verify(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Verification role required".into(),
            )));
        }
        Ok(RequireVerifier(user.verifier_context()?))
    }
}

/// Requires an administrative role (`super_admin` or `placement_rep`) and a
/// batch.
pub struct RequireAdmin(pub VerifierContext);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !roles::can_administer(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Placement representative role required".into(),
            )));
        }
        Ok(RequireAdmin(user.verifier_context()?))
    }
}

/// Requires `super_admin`. Unlike the other guards no batch is needed,
/// since batches are created under this role.
pub struct RequireSuperAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != roles::ROLE_SUPER_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Super admin role required".into(),
            )));
        }
        Ok(RequireSuperAdmin(user))
    }
}
