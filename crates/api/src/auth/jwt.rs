//! Access tokens.
//!
//! Tokens are issued by the institution's identity service; this server
//! only needs to read them, plus mint them in tests and tooling. The batch
//! travels in the token so handlers never look it up.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use placement_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim every accepted token must carry.
pub const TOKEN_ISSUER: &str = "placement-tracker";

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Student id for `student` and `class_rep`; staff id otherwise.
    pub sub: DbId,
    pub role: String,
    /// `None` for accounts not attached to a batch. Those cannot use
    /// batch-scoped endpoints.
    pub batch_id: Option<DbId>,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret.
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Reads `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default 60).
    ///
    /// # Panics
    ///
    /// On a missing or empty secret or an unparseable expiry.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .ok()
            .map(|v| v.parse().expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64"))
            .unwrap_or(DEFAULT_ACCESS_EXPIRY_MINS);

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        // `sub` is numeric here, and jsonwebtoken only counts string subjects
        // as present, so it cannot be listed as a required claim.
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }
}

/// Mint a signed access token.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    batch_id: Option<DbId>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let issued_at = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        batch_id,
        iss: TOKEN_ISSUER.to_string(),
        iat: issued_at,
        exp: issued_at + config.access_token_expiry_mins * 60,
        jti: Uuid::new_v4().to_string(),
    };
    sign(&claims, config)
}

/// Check signature, issuer and expiry, and return the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(config.secret.as_bytes());
    decode::<Claims>(token, &key, &config.validation()).map(|data| data.claims)
}

fn sign(claims: &Claims, config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
