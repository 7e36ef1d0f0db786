// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route-gating middleware for page navigations.
//!
//! Browser navigations to protected page routes are redirected rather than
//! answered with JSON errors: unauthenticated visitors go to `/login`,
//! authenticated visitors without the required role go back to their
//! dashboard. API routes are untouched; the extractors in `extractor.rs`
//! guard those with envelope responses.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::extractor::session_token;
use super::roles::Role;
use crate::state::AppState;

/// Where unauthenticated navigations are sent.
pub const LOGIN_REDIRECT: &str = "/login";

/// Where authenticated-but-unentitled navigations are sent.
const HOME_REDIRECT: &str = "/dashboard";

#[derive(Debug, Clone, Copy)]
enum PagePolicy {
    /// Any authenticated role
    Authenticated,
    /// role in {admin, employee}
    CompanyStaff,
    /// role == super_admin
    SuperAdmin,
}

/// Page route families and the identity each requires.
const PAGE_POLICIES: &[(&str, PagePolicy)] = &[
    ("/admin", PagePolicy::SuperAdmin),
    ("/company-dashboard", PagePolicy::CompanyStaff),
    ("/company-setup", PagePolicy::CompanyStaff),
    ("/dashboard", PagePolicy::Authenticated),
    ("/create-request", PagePolicy::Authenticated),
];

/// Match a path against the policy table. Prefixes match whole segments
/// only, so `/administrate` is not caught by the `/admin` family.
fn policy_for(path: &str) -> Option<PagePolicy> {
    PAGE_POLICIES.iter().find_map(|(prefix, policy)| {
        let matched = path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'));
        matched.then_some(*policy)
    })
}

/// Edge enforcement of the route policy table for page navigations.
pub async fn page_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(policy) = policy_for(request.uri().path()) else {
        return next.run(request).await;
    };

    let claims = session_token(request.headers()).and_then(|token| state.tokens.verify(&token));

    let Some(claims) = claims else {
        return Redirect::to(LOGIN_REDIRECT).into_response();
    };

    let allowed = match policy {
        PagePolicy::Authenticated => true,
        PagePolicy::CompanyStaff => claims.role.is_company_staff(),
        PagePolicy::SuperAdmin => claims.role == Role::SuperAdmin,
    };

    if allowed {
        next.run(request).await
    } else {
        Redirect::to(HOME_REDIRECT).into_response()
    }
}
