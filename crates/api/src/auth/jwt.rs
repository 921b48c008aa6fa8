//! Access and refresh tokens.
//!
//! An access token is an HS256 JWT naming the user and the `user_sessions`
//! row it was issued for; the auth extractor also requires that session to be
//! active, so logout takes effect before `exp`. A refresh token is an opaque
//! UUID handed to the client once; the database keeps only its SHA-256 hex
//! digest.

use agenda_core::types::DbId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    /// Session id.
    pub sid: DbId,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_token_ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// When a session created now should stop accepting its refresh token.
    pub fn refresh_expires_at(&self) -> chrono::DateTime<Utc> {
        Utc::now() + Duration::days(self.refresh_token_expiry_days)
    }
}

/// Sign an access token for `user_id` within session `session_id`.
pub fn generate_access_token(
    user_id: DbId,
    session_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        sid: session_id,
        exp: iat + config.access_token_ttl_secs(),
        iat,
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry. Session state is not consulted here.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// New refresh token as `(plaintext, digest)`.
pub fn generate_refresh_token() -> (String, String) {
    let token = Uuid::new_v4().to_string();
    let digest = hash_refresh_token(&token);
    (token, digest)
}

pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-signing-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn access_token_carries_user_and_session() {
        let token = generate_access_token(42, 7, &config()).unwrap();
        let claims = validate_token(&token, &config()).unwrap();
        assert_eq!((claims.sub, claims.sid), (42, 7));
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Past the default 60 second leeway.
        let iat = Utc::now().timestamp() - 600;
        let claims = Claims {
            sub: 1,
            sid: 1,
            exp: iat + 300,
            iat,
            jti: "expired".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config().secret.as_bytes()),
        )
        .unwrap();
        assert!(validate_token(&token, &config()).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let token = generate_access_token(1, 1, &config()).unwrap();
        let other = JwtConfig {
            secret: "somebody-else".to_string(),
            ..config()
        };
        assert!(validate_token(&token, &other).is_err());
        assert!(validate_token("not.a.jwt", &config()).is_err());
    }

    #[test]
    fn refresh_digest_is_stable_sha256_hex() {
        let (token, digest) = generate_refresh_token();
        assert_eq!(digest, hash_refresh_token(&token));
        assert_eq!(digest.len(), 64);
        assert_ne!(generate_refresh_token().0, token);
    }
}
