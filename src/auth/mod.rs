// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Session authentication and role-based authorization for the portal API.
//!
//! ## Auth Flow
//!
//! 1. User registers or logs in with email + password (bcrypt, cost 12)
//! 2. Server issues an HS256 session token carrying `{sub, email, role}`
//! 3. Subsequent requests send `Authorization: Bearer <token>` (or the
//!    http-only session cookie set at login)
//! 4. Extractors verify the token and enforce the route's role policy
//!
//! ## Security
//!
//! - The signing secret is injected at construction and checked at startup
//!   (32-byte minimum in production)
//! - Token rejections never reveal the failure cause
//! - Login and registration are enumeration-safe
//! - Clock skew tolerance is 60 seconds
//! - No revocation list: tokens stay valid until expiry (see `tokens` for
//!   the pluggable revocation extension point)

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod tokens;

pub use claims::{AuthenticatedUser, SessionClaims};
pub use error::AuthError;
pub use extractor::{Auth, CompanyStaff, SuperAdminOnly, SESSION_COOKIE};
pub use middleware::page_gate;
pub use roles::Role;
pub use tokens::TokenService;
