//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller resolved from a JWT Bearer token.
//! - [`rbac::RequireStudent`] -- a student (or class rep) with a batch.
//! - [`rbac::RequireVerifier`] -- a role that may verify outcomes, with a batch.
//! - [`rbac::RequireAdmin`] -- a role that may manage drives, with a batch.

pub mod auth;
pub mod rbac;
