// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Claims embedded in a portal session token.
///
/// A claim set is immutable once issued; refreshing produces a new token with
/// fresh timing fields rather than mutating an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - the user's unique identifier
    pub sub: String,
    /// User's email at issuance time
    pub email: String,
    /// User's role at issuance time
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Build a claim set expiring `lifetime` from now.
    pub fn new(user_id: &str, email: &str, role: Role, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }
}

/// Authenticated user information extracted from a verified token.
///
/// This is the primary type handlers receive to represent the caller.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Canonical user ID (token `sub` claim)
    pub user_id: String,
    /// User's email
    pub email: String,
    /// User's role
    pub role: Role,
    /// Token issuance time (not serialized)
    #[serde(skip)]
    pub issued_at: i64,
    /// Token expiration (not serialized)
    #[serde(skip)]
    pub expires_at: i64,
}

impl From<SessionClaims> for AuthenticatedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

impl AuthenticatedUser {
    /// Check if the user has at least the privileges of the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_privilege(required)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    pub fn is_company_staff(&self) -> bool {
        self.role.is_company_staff()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_claims_carry_identity_and_timing() {
        let claims = SessionClaims::new("user-1", "a@b.com", Role::DataSubject, Duration::hours(24));
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.role, Role::DataSubject);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn authenticated_user_from_claims() {
        let claims = SessionClaims::new("user-2", "rep@corp.com", Role::Employee, Duration::hours(1));
        let user = AuthenticatedUser::from(claims.clone());
        assert_eq!(user.user_id, "user-2");
        assert_eq!(user.email, "rep@corp.com");
        assert_eq!(user.role, Role::Employee);
        assert_eq!(user.issued_at, claims.iat);
        assert_eq!(user.expires_at, claims.exp);
    }

    #[test]
    fn role_helpers_follow_policy() {
        let claims = SessionClaims::new("user-3", "x@y.com", Role::Admin, Duration::hours(1));
        let user = AuthenticatedUser::from(claims);
        assert!(user.has_role(Role::Employee));
        assert!(user.is_company_staff());
        assert!(!user.is_super_admin());
    }

    #[test]
    fn timing_fields_are_not_serialized() {
        let user = AuthenticatedUser {
            user_id: "u".into(),
            email: "e@x.io".into(),
            role: Role::DataSubject,
            issued_at: 1,
            expires_at: 2,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("issued_at").is_none());
        assert!(json.get("expires_at").is_none());
    }
}
