//! Environment-driven server settings.
//!
//! | Env Var                    | Default                  |
//! |----------------------------|--------------------------|
//! | `HOST`                     | `0.0.0.0`                |
//! | `PORT`                     | `3000`                   |
//! | `CORS_ORIGINS`             | `http://localhost:5173`  |
//! | `REQUEST_TIMEOUT_SECS`     | `30`                     |
//! | `MEDIA_ROOT`               | `media`                  |
//! | `MEDIA_URL`                | `/media/`                |
//! | `MAX_UPLOAD_BYTES`         | `5242880` (5 MiB)        |
//! | `JWT_SECRET`               | required                 |
//! | `JWT_ACCESS_EXPIRY_MINS`   | `60`                     |
//! | `JWT_REFRESH_EXPIRY_DAYS`  | `7`                      |
//!
//! Malformed values panic at startup.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins (comma-separated in `CORS_ORIGINS`).
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Directory uploaded pictures are written under.
    pub media_root: PathBuf,
    /// Public URL prefix that stored picture paths are appended to.
    pub media_url: String,
    /// Request body cap; bounds picture uploads.
    pub max_upload_bytes: usize,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            media_root: env_or("MEDIA_ROOT", PathBuf::from("media")),
            media_url: env_or("MEDIA_URL", "/media/".to_string()),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            jwt: jwt_from_env(),
        }
    }
}

fn jwt_from_env() -> JwtConfig {
    let secret = std::env::var("JWT_SECRET").unwrap_or_default();
    assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

    JwtConfig {
        secret,
        access_token_expiry_mins: env_or("JWT_ACCESS_EXPIRY_MINS", 60),
        refresh_token_expiry_days: env_or("JWT_REFRESH_EXPIRY_DAYS", 7),
    }
}

/// Read and parse `name`, falling back to `default` when it is unset.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}
