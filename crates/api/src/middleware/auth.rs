//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use placement_core::error::CoreError;
use placement_core::types::DbId;
use placement_tracker::{StudentContext, VerifierContext};

use crate::auth::jwt::{validate_token, JwtConfig};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from a JWT Bearer token in the
/// `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The caller's id (from `claims.sub`).
    pub user_id: DbId,
    /// The caller's role name.
    pub role: String,
    /// The batch the caller is scoped to (from `claims.batch_id`).
    pub batch_id: Option<DbId>,
}

impl AuthUser {
    /// Decode a raw token into an `AuthUser`.
    pub fn from_token(token: &str, config: &JwtConfig) -> Result<Self, AppError> {
        let claims =
            validate_token(token, config).map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            batch_id: claims.batch_id,
        })
    }

    /// The caller's batch, or `Forbidden` if the token carries none.
    pub fn batch_scope(&self) -> Result<DbId, CoreError> {
        self.batch_id
            .ok_or_else(|| CoreError::Forbidden("No batch is associated with this account".into()))
    }

    pub fn student_context(&self) -> Result<StudentContext, CoreError> {
        Ok(StudentContext {
            student_id: self.user_id,
            batch_id: self.batch_scope()?,
        })
    }

    pub fn verifier_context(&self) -> Result<VerifierContext, CoreError> {
        Ok(VerifierContext {
            actor_id: self.user_id,
            role: self.role.clone(),
            batch_id: self.batch_scope()?,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        AuthUser::from_token(token, &state.config.jwt)
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Authorization header is not valid ASCII"))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}
