// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.
//!
//! Token failures collapse to a single coarse tag: a caller can learn that a
//! token was rejected but never why (expired vs. tampered vs. foreign-signed).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::codes;

/// Rejection produced by the auth extractors and page gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer token in the Authorization header or session cookie
    MissingToken,
    /// Token present but failed verification (cause deliberately not exposed)
    InvalidToken,
    /// Authenticated but not company staff
    InsufficientPermissions,
    /// Authenticated but not the super admin (provisioning path)
    SuperAdminRequired,
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: &'static str,
    message: &'static str,
}

impl AuthError {
    /// Stable machine-readable code for this rejection.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => codes::AUTH_TOKEN_MISSING,
            AuthError::InvalidToken => codes::AUTH_TOKEN_INVALID,
            AuthError::InsufficientPermissions => codes::INSUFFICIENT_PERMISSIONS,
            AuthError::SuperAdminRequired => codes::SUPER_ADMIN_REQUIRED,
        }
    }

    /// 401 for authentication failures, 403 for authorization failures.
    /// Never 401 for an authenticated-but-unentitled caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions | AuthError::SuperAdminRequired => {
                StatusCode::FORBIDDEN
            }
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Authentication is required"),
            AuthError::InvalidToken => write!(f, "Authentication failed"),
            AuthError::InsufficientPermissions => {
                write!(f, "Insufficient permissions for this operation")
            }
            AuthError::SuperAdminRequired => write!(f, "Super admin role is required"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Authentication is required",
            AuthError::InvalidToken => "Authentication failed",
            AuthError::InsufficientPermissions => "Insufficient permissions for this operation",
            AuthError::SuperAdminRequired => "Super admin role is required",
        };
        let body = Json(AuthErrorBody {
            code: self.code(),
            message,
        });
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_token_returns_401() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "AUTH_TOKEN_MISSING");
    }

    #[tokio::test]
    async fn invalid_token_returns_401_with_coarse_tag() {
        let response = AuthError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "AUTH_TOKEN_INVALID");
        // The body must not reveal why verification failed.
        let text = body.to_string().to_lowercase();
        assert!(!text.contains("expire"));
        assert!(!text.contains("signature"));
    }

    #[tokio::test]
    async fn authorization_failures_return_403() {
        assert_eq!(
            AuthError::InsufficientPermissions.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::SuperAdminRequired.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
