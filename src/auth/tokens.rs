// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with a process-wide secret injected at
//! construction time. Verification failure is a normal outcome, not an
//! exceptional one: `verify` returns `None` for any invalid token (tampered,
//! foreign-signed, expired, garbage) and never surfaces the cause.
//!
//! There is no revocation list: a token issued before logout remains
//! cryptographically valid until its natural expiry. That is the stateless
//! session tradeoff this service makes; `with_revocation_check` is the
//! extension point for deployments that need one.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::SessionClaims;
use super::roles::Role;
use crate::config::{AuthSettings, ConfigError};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Pluggable revocation check consulted during verification.
/// Returning `true` marks the claims as revoked.
pub type RevocationCheck = dyn Fn(&SessionClaims) -> bool + Send + Sync;

/// Issues, verifies and refreshes session tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
    revocation: Option<Arc<RevocationCheck>>,
}

impl TokenService {
    /// Construct from validated settings.
    ///
    /// Fails fast when the secret is absent, or shorter than 32 bytes in a
    /// production deployment.
    pub fn new(settings: &AuthSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            lifetime: Duration::hours(settings.token_lifetime_hours),
            revocation: None,
        })
    }

    /// Install a revocation check invoked inside `verify`.
    pub fn with_revocation_check(mut self, check: Arc<RevocationCheck>) -> Self {
        self.revocation = Some(check);
        self
    }

    /// Token lifetime applied at issuance.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a signed token for the given identity.
    pub fn issue(
        &self,
        user_id: &str,
        email: &str,
        role: Role,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = SessionClaims::new(user_id, email, role, self.lifetime);
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify a token, returning its claims only when the signature validates
    /// and the token is unexpired (and unrevoked, when a check is installed).
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).ok()?;

        if let Some(check) = &self.revocation {
            if check(&data.claims) {
                return None;
            }
        }

        Some(data.claims)
    }

    /// Re-issue a token with a fresh expiry.
    ///
    /// An already invalid or expired token is never extended.
    pub fn refresh(&self, token: &str) -> Option<String> {
        let claims = self.verify(token)?;
        self.issue(&claims.sub, &claims.email, claims.role).ok()
    }
}

/// Parse a `Bearer <token>` authorization header value.
///
/// Only an exact `"Bearer "` prefix with a non-empty remainder yields a
/// token; any other shape (missing prefix, wrong scheme, empty token) is
/// treated as absent.
pub fn extract_bearer(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TOKEN_LIFETIME_HOURS;

    fn service_with_secret(secret: &str) -> TokenService {
        TokenService::new(&AuthSettings::new(
            secret,
            DEFAULT_TOKEN_LIFETIME_HOURS,
            false,
        ))
        .expect("valid settings")
    }

    fn test_service() -> TokenService {
        service_with_secret("unit-test-signing-secret")
    }

    #[test]
    fn construction_fails_fast_on_bad_secret() {
        assert!(TokenService::new(&AuthSettings::new("", 24, false)).is_err());
        assert!(TokenService::new(&AuthSettings::new("short", 24, true)).is_err());
        assert!(TokenService::new(&AuthSettings::new(
            "0123456789abcdef0123456789abcdef",
            24,
            true
        ))
        .is_ok());
    }

    #[test]
    fn issue_then_verify_round_trips_identity() {
        let service = test_service();
        let token = service
            .issue("user-1", "user@example.com", Role::DataSubject)
            .unwrap();

        let claims = service.verify(&token).expect("token verifies");
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, Role::DataSubject);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_foreign_secret() {
        let issuer = service_with_secret("secret-number-one");
        let verifier = service_with_secret("secret-number-two");

        let token = issuer.issue("user-1", "a@b.com", Role::Admin).unwrap();
        assert!(verifier.verify(&token).is_none());
    }

    #[test]
    fn verify_rejects_garbage_without_panicking() {
        let service = test_service();
        assert!(service.verify("").is_none());
        assert!(service.verify("not.a.jwt").is_none());
        assert!(service.verify("aaaa.bbbb.cccc").is_none());
        assert!(service.verify("Bearer abc").is_none());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let service = test_service();
        // Hand-craft a token whose expiry is well past the leeway window.
        let claims = SessionClaims {
            sub: "user-1".into(),
            email: "a@b.com".into(),
            role: Role::DataSubject,
            iat: 1_600_000_000,
            exp: 1_600_003_600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"unit-test-signing-secret"),
        )
        .unwrap();

        assert!(service.verify(&token).is_none());
    }

    #[test]
    fn refresh_extends_valid_tokens_only() {
        let service = test_service();
        let token = service.issue("user-1", "a@b.com", Role::Employee).unwrap();

        let refreshed = service.refresh(&token).expect("refresh succeeds");
        let claims = service.verify(&refreshed).expect("refreshed verifies");
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, Role::Employee);

        assert!(service.refresh("garbage").is_none());
    }

    #[test]
    fn revocation_check_is_consulted() {
        let service = test_service().with_revocation_check(Arc::new(|claims: &SessionClaims| {
            claims.sub == "revoked-user"
        }));

        let live = service.issue("user-1", "a@b.com", Role::DataSubject).unwrap();
        assert!(service.verify(&live).is_some());

        let revoked = service
            .issue("revoked-user", "r@b.com", Role::DataSubject)
            .unwrap();
        assert!(service.verify(&revoked).is_none());
    }

    #[test]
    fn extract_bearer_requires_exact_prefix() {
        assert_eq!(extract_bearer("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer("bearer abc123"), None);
        assert_eq!(extract_bearer("Basic abc123"), None);
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer("abc123"), None);
        assert_eq!(extract_bearer(""), None);
    }
}
