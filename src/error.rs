// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Uniform response envelope for the portal API.
//!
//! Every endpoint answers with `{ code, data?, message? }`. The `code` is a
//! stable machine-readable tag; human-facing text is resolved by the frontend
//! translation layer, never by this service. Success bodies are built through
//! [`Envelope`] and failures through [`ApiError`], so a handler cannot emit a
//! body without a code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Stable response codes shared across all endpoints.
///
/// Security-sensitive flows deliberately collapse distinct internal causes
/// into one external code (`INVALID_CREDENTIALS`, `AUTH_TOKEN_INVALID`) so
/// responses cannot be used to enumerate accounts or probe token state.
pub mod codes {
    pub const REGISTRATION_SUCCESS: &str = "REGISTRATION_SUCCESS";
    pub const LOGIN_SUCCESS: &str = "LOGIN_SUCCESS";
    pub const TOKEN_VALID: &str = "TOKEN_VALID";
    pub const TOKEN_REFRESHED: &str = "TOKEN_REFRESHED";
    pub const PASSWORD_CHANGED: &str = "PASSWORD_CHANGED";
    pub const REQUEST_CREATED: &str = "REQUEST_CREATED";
    pub const REQUEST_LIST: &str = "REQUEST_LIST";
    pub const STATUS_UPDATED: &str = "STATUS_UPDATED";
    pub const PAYLOAD_RETRIEVED: &str = "PAYLOAD_RETRIEVED";
    pub const COMPANY_CREATED: &str = "COMPANY_CREATED";
    pub const COMPANY_INFO: &str = "COMPANY_INFO";
    pub const USER_PROVISIONED: &str = "USER_PROVISIONED";
    pub const USER_LIST: &str = "USER_LIST";
    pub const AUDIT_EVENTS: &str = "AUDIT_EVENTS";

    pub const VALIDATION_MISSING_FIELDS: &str = "VALIDATION_MISSING_FIELDS";
    pub const VALIDATION_EMAIL_INVALID: &str = "VALIDATION_EMAIL_INVALID";
    pub const VALIDATION_WEAK_PASSWORD: &str = "VALIDATION_WEAK_PASSWORD";
    pub const VALIDATION_USER_TYPE_INVALID: &str = "VALIDATION_USER_TYPE_INVALID";
    pub const VALIDATION_CPF_INVALID: &str = "VALIDATION_CPF_INVALID";
    pub const VALIDATION_REQUEST_TYPE_INVALID: &str = "VALIDATION_REQUEST_TYPE_INVALID";
    pub const VALIDATION_STATUS_INVALID: &str = "VALIDATION_STATUS_INVALID";
    pub const VALIDATION_ROLE_INVALID: &str = "VALIDATION_ROLE_INVALID";
    pub const VALIDATION_PUBLIC_KEY_INVALID: &str = "VALIDATION_PUBLIC_KEY_INVALID";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const AUTH_TOKEN_MISSING: &str = "AUTH_TOKEN_MISSING";
    pub const AUTH_TOKEN_INVALID: &str = "AUTH_TOKEN_INVALID";
    pub const INSUFFICIENT_PERMISSIONS: &str = "INSUFFICIENT_PERMISSIONS";
    pub const SUPER_ADMIN_REQUIRED: &str = "SUPER_ADMIN_REQUIRED";
    pub const PASSWORD_REUSE: &str = "PASSWORD_REUSE";
    pub const COMPANY_SETUP_REQUIRED: &str = "COMPANY_SETUP_REQUIRED";
    pub const COMPANY_EXISTS: &str = "COMPANY_EXISTS";
    pub const USER_EXISTS: &str = "USER_EXISTS";
    pub const REQUEST_NOT_FOUND: &str = "REQUEST_NOT_FOUND";
    pub const PAYLOAD_NOT_FOUND: &str = "PAYLOAD_NOT_FOUND";
    pub const REQUEST_CREATE_FAILED: &str = "REQUEST_CREATE_FAILED";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Success envelope. `data` is omitted from the JSON when absent.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn with_data(code: &'static str, data: T) -> Self {
        Self {
            code,
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn of(code: &'static str) -> Self {
        Self { code, data: None }
    }
}

/// API error carrying an HTTP status and a stable code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str) -> Self {
        Self {
            status,
            code,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn validation(code: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code)
    }

    pub fn unauthorized(code: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code)
    }

    pub fn forbidden(code: &'static str) -> Self {
        Self::new(StatusCode::FORBIDDEN, code)
    }

    pub fn not_found(code: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, code)
    }

    pub fn conflict(code: &'static str) -> Self {
        Self::new(StatusCode::CONFLICT, code)
    }

    /// Dependency failures the caller can fix (e.g. company not configured).
    pub fn dependency(code: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code)
    }

    /// Unexpected failure. Detail belongs in the server log, not the body.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, codes::INTERNAL_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
