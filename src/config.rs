// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is read from the environment once at startup and passed into
//! constructors ([`crate::auth::TokenService`], [`crate::storage::FileStore`]).
//! Business logic never reads the environment directly, so tests can inject
//! secrets deterministically.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SESSION_SECRET` | HS256 signing secret for session tokens | Required |
//! | `TOKEN_LIFETIME_HOURS` | Session token lifetime | `24` |
//! | `APP_ENV` | `production` enforces the 32-byte secret minimum | `development` |
//! | `DATA_DIR` | Root directory for persistent storage | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `SEED_ADMIN_EMAIL` | Bootstrap super admin email | Unset |
//! | `SEED_ADMIN_PASSWORD` | Bootstrap super admin temporary password | Unset |

use std::env;

use thiserror::Error;

/// Environment variable name for the session signing secret.
pub const SESSION_SECRET_ENV: &str = "SESSION_SECRET";

/// Environment variable name for the token lifetime in hours.
pub const TOKEN_LIFETIME_HOURS_ENV: &str = "TOKEN_LIFETIME_HOURS";

/// Environment variable name for the deployment mode.
pub const APP_ENV_ENV: &str = "APP_ENV";

/// Environment variable name for the persistent data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the bind host.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Environment variable names for the bootstrap super admin account.
pub const SEED_ADMIN_EMAIL_ENV: &str = "SEED_ADMIN_EMAIL";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";

/// Minimum signing secret length enforced in production deployments.
/// A shorter secret undermines the HS256 integrity guarantee.
pub const MIN_SECRET_BYTES: usize = 32;

/// Default session token lifetime.
pub const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;

/// Configuration errors surfaced at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SESSION_SECRET is not set")]
    MissingSecret,
    #[error("SESSION_SECRET must be at least 32 bytes in production (got {0})")]
    SecretTooShort(usize),
    #[error("TOKEN_LIFETIME_HOURS must be a positive integer")]
    InvalidLifetime,
}

/// Settings for token issuance and verification.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Process-wide HS256 signing secret.
    pub secret: String,
    /// Token lifetime in hours.
    pub token_lifetime_hours: i64,
    /// Whether the secret-length floor applies.
    pub production: bool,
}

impl AuthSettings {
    pub fn new(secret: impl Into<String>, token_lifetime_hours: i64, production: bool) -> Self {
        Self {
            secret: secret.into(),
            token_lifetime_hours,
            production,
        }
    }

    /// Load from the environment. Lifetime parse failures are reported rather
    /// than silently defaulted; a missing secret is reported by [`validate`].
    ///
    /// [`validate`]: AuthSettings::validate
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var(SESSION_SECRET_ENV).unwrap_or_default();
        let token_lifetime_hours = match env::var(TOKEN_LIFETIME_HOURS_ENV) {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|hours| *hours > 0)
                .ok_or(ConfigError::InvalidLifetime)?,
            Err(_) => DEFAULT_TOKEN_LIFETIME_HOURS,
        };
        let production = env::var(APP_ENV_ENV)
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            secret,
            token_lifetime_hours,
            production,
        })
    }

    /// Validate the settings. Called by `TokenService::new` so the process
    /// fails fast at startup rather than at first login.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if self.production && self.secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::SecretTooShort(self.secret.len()));
        }
        if self.token_lifetime_hours <= 0 {
            return Err(ConfigError::InvalidLifetime);
        }
        Ok(())
    }
}

/// Bind address and storage location.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub data_dir: String,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var(PORT_ENV)
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(8080);
        let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| "./data".to_string());
        Self {
            host,
            port,
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_secret() {
        let settings = AuthSettings::new("", DEFAULT_TOKEN_LIFETIME_HOURS, false);
        assert_eq!(settings.validate(), Err(ConfigError::MissingSecret));
    }

    #[test]
    fn validate_enforces_secret_floor_in_production_only() {
        let short = "short-secret";
        let dev = AuthSettings::new(short, DEFAULT_TOKEN_LIFETIME_HOURS, false);
        assert_eq!(dev.validate(), Ok(()));

        let prod = AuthSettings::new(short, DEFAULT_TOKEN_LIFETIME_HOURS, true);
        assert_eq!(
            prod.validate(),
            Err(ConfigError::SecretTooShort(short.len()))
        );

        let prod_long = AuthSettings::new(
            "0123456789abcdef0123456789abcdef",
            DEFAULT_TOKEN_LIFETIME_HOURS,
            true,
        );
        assert_eq!(prod_long.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_non_positive_lifetime() {
        let settings = AuthSettings::new("a-long-enough-development-secret", 0, false);
        assert_eq!(settings.validate(), Err(ConfigError::InvalidLifetime));
    }
}
