use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use model::entities::{prelude::*, user};
use rand::RngCore;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::ApiError;
use crate::schemas::AppState;

/// Hash a plaintext password and return a PHC-encoded Argon2id hash string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let argon2 = Argon2::default();

    // Salt must come from a CSPRNG
    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?
        .to_string();

    Ok(hash)
}

/// Verify a plaintext password against a PHC-encoded Argon2 hash.
///
/// Returns:
/// - Ok(true)  if password matches
/// - Ok(false) if password does not match
/// - Err(_)    if the stored hash is malformed
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| ApiError::Internal(format!("Invalid password hash format: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ApiError::Internal(format!(
            "Failed to verify password: {e}"
        ))),
    }
}

/// JWT claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User email
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Create a signed HS256 access token for the given email.
pub fn create_access_token(
    email: &str,
    secret_key: &str,
    expire_minutes: i64,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(expire_minutes)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret_key.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to sign access token: {e}")))
}

/// Decode and validate an access token. Returns None for any invalid,
/// malformed or expired token.
pub fn decode_access_token(token: &str, secret_key: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret_key.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Generate a URL-safe random invite token (32 bytes of entropy).
pub fn generate_invite_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Authenticated caller, extracted from the bearer token on every protected
/// endpoint. Locked accounts are rejected here so no handler sees them.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        trace!("Extracting bearer token from request");
        let state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Could not validate credentials".to_string()))?;

        let claims = decode_access_token(token, &state.config.secret_key)
            .ok_or_else(|| ApiError::Unauthorized("Could not validate credentials".to_string()))?;

        debug!("Token valid for subject: {}", claims.sub);

        let user = User::find()
            .filter(user::Column::Email.eq(&claims.sub))
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Could not validate credentials".to_string()))?;

        if user.is_locked {
            warn!("Locked account attempted access: {}", user.email);
            return Err(ApiError::AccountLocked);
        }

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_token_round_trip() {
        let token = create_access_token("rider@example.com", "test-secret", 60).unwrap();
        let claims = decode_access_token(&token, "test-secret").expect("token should decode");
        assert_eq!(claims.sub, "rider@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let token = create_access_token("rider@example.com", "test-secret", 60).unwrap();
        assert!(decode_access_token(&token, "other-secret").is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = create_access_token("rider@example.com", "test-secret", -120).unwrap();
        assert!(decode_access_token(&token, "test-secret").is_none());
    }

    #[test]
    fn test_invite_tokens_are_unique() {
        let a = generate_invite_token();
        let b = generate_invite_token();
        assert_ne!(a, b);
        assert!(a.len() >= 40);
    }
}
