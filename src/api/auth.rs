// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: registration, login, token verification/refresh and
//! password change.
//!
//! Login and registration are enumeration-safe: the response for "no such
//! user" is byte-identical to "wrong password", and registering a duplicate
//! email returns the same success as a fresh registration without touching
//! the original record.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tower_cookies::{
    cookie::{time::Duration as CookieDuration, SameSite},
    Cookie, Cookies,
};
use uuid::Uuid;

use crate::{
    audit_log,
    auth::{password, tokens, Auth, AuthenticatedUser, Role, SESSION_COOKIE},
    error::{codes, ApiError, Envelope},
    models::{ChangePasswordBody, LoginBody, RegisterBody, UserInfo},
    state::AppState,
    storage::{AuditEvent, AuditEventType, AuditRepository, StorageError, StoredUser, UserRepository},
};

/// Build the http-only session cookie carrying the token.
fn session_cookie(token: &str, max_age_seconds: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie.set_max_age(CookieDuration::seconds(max_age_seconds));
    cookie
}

/// Attach the token to the response as an `Authorization: Bearer` header.
fn with_bearer_header(mut response: Response, token: &str) -> Result<Response, ApiError> {
    let value =
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ApiError::internal())?;
    response.headers_mut().insert(header::AUTHORIZATION, value);
    Ok(response)
}

/// Register a new data subject account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterBody,
    tag = "Auth",
    responses(
        (status = 200, description = "Registered (identical response for duplicate emails)"),
        (status = 400, description = "Missing fields, invalid email or weak password"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<Envelope<()>>), ApiError> {
    let (email, password_input, user_type) = match (body.email, body.password, body.user_type) {
        (Some(email), Some(password), Some(user_type))
            if !email.is_empty() && !password.is_empty() && !user_type.is_empty() =>
        {
            (email, password, user_type)
        }
        _ => return Err(ApiError::validation(codes::VALIDATION_MISSING_FIELDS)),
    };

    if !password::is_valid_email(&email) {
        return Err(ApiError::validation(codes::VALIDATION_EMAIL_INVALID));
    }
    if user_type != "data_subject" {
        return Err(ApiError::validation(codes::VALIDATION_USER_TYPE_INVALID));
    }
    if !password::validate_strength(&password_input) {
        return Err(ApiError::validation(codes::VALIDATION_WEAK_PASSWORD));
    }

    let repo = UserRepository::new(&state.storage);

    // Duplicate emails fall through to the same success response, and the
    // existing record (including its hash) is never overwritten.
    if repo.find_by_email(&email).is_err() {
        let hashed = password::hash(&password_input).map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            ApiError::internal()
        })?;
        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash: hashed,
            role: Role::DataSubject,
            company_id: None,
            password_temporary: false,
            created_at: Utc::now(),
        };
        match repo.create(&user) {
            Ok(()) => {
                audit_log!(
                    &state.storage,
                    AuditEventType::UserRegistered,
                    &user.id,
                    "user",
                    &user.id
                );
            }
            Err(StorageError::AlreadyExists(_)) => {}
            Err(e) => {
                tracing::error!(error = %e, "failed to persist credential record");
                return Err(ApiError::internal());
            }
        }
    }

    Ok((StatusCode::OK, Json(Envelope::of(codes::REGISTRATION_SUCCESS))))
}

/// Authenticate and issue a session token.
///
/// The token is returned via the `Authorization` response header and an
/// http-only SameSite-Strict cookie.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginBody,
    tag = "Auth",
    responses(
        (status = 200, description = "Authenticated; token in header and cookie", body = UserInfo),
        (status = 401, description = "Invalid credentials (identical for unknown email and wrong password)"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<LoginBody>,
) -> Result<Response, ApiError> {
    let (email, password_input) = match (body.email, body.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => return Err(ApiError::validation(codes::VALIDATION_MISSING_FIELDS)),
    };

    if !password::is_valid_email(&email) {
        return Err(ApiError::validation(codes::VALIDATION_EMAIL_INVALID));
    }

    let repo = UserRepository::new(&state.storage);
    let audit = AuditRepository::new(&state.storage);

    let user = match repo.find_by_email(&email) {
        Ok(user) => user,
        Err(_) => {
            let _ = audit.log(&AuditEvent::new(AuditEventType::LoginFailed).failed("unknown email"));
            return Err(ApiError::unauthorized(codes::INVALID_CREDENTIALS));
        }
    };

    if !password::verify(&password_input, &user.password_hash) {
        let _ = audit.log(
            &AuditEvent::new(AuditEventType::LoginFailed)
                .with_user(&user.id)
                .failed("wrong password"),
        );
        return Err(ApiError::unauthorized(codes::INVALID_CREDENTIALS));
    }

    let token = state
        .tokens
        .issue(&user.id, &user.email, user.role)
        .map_err(|e| {
            tracing::error!(error = %e, "token issuance failed");
            ApiError::internal()
        })?;

    cookies.add(session_cookie(&token, state.tokens.lifetime().num_seconds()));
    audit_log!(&state.storage, AuditEventType::LoginSucceeded, &user.id);

    let response = (
        StatusCode::OK,
        Json(Envelope::with_data(codes::LOGIN_SUCCESS, UserInfo::from(&user))),
    )
        .into_response();
    with_bearer_header(response, &token)
}

/// Verify the bearer token from the Authorization header.
///
/// Header only; the cookie channel is deliberately not consulted here.
#[utoipa::path(
    post,
    path = "/api/auth/verify",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Token is valid", body = AuthenticatedUser),
        (status = 401, description = "Token missing or invalid"),
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Envelope<AuthenticatedUser>>), ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized(codes::AUTH_TOKEN_MISSING))?;
    let token = tokens::extract_bearer(value)
        .ok_or_else(|| ApiError::unauthorized(codes::AUTH_TOKEN_MISSING))?;
    let claims = state
        .tokens
        .verify(token)
        .ok_or_else(|| ApiError::unauthorized(codes::AUTH_TOKEN_INVALID))?;

    Ok((
        StatusCode::OK,
        Json(Envelope::with_data(
            codes::TOKEN_VALID,
            AuthenticatedUser::from(claims),
        )),
    ))
}

/// Re-issue a valid token with a fresh expiry.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Fresh token in header and cookie", body = AuthenticatedUser),
        (status = 401, description = "Token missing or invalid; expired tokens are not extended"),
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized(codes::AUTH_TOKEN_MISSING))?;
    let token = tokens::extract_bearer(value)
        .ok_or_else(|| ApiError::unauthorized(codes::AUTH_TOKEN_MISSING))?;

    let refreshed = state
        .tokens
        .refresh(token)
        .ok_or_else(|| ApiError::unauthorized(codes::AUTH_TOKEN_INVALID))?;
    let claims = state
        .tokens
        .verify(&refreshed)
        .ok_or_else(ApiError::internal)?;

    cookies.add(session_cookie(
        &refreshed,
        state.tokens.lifetime().num_seconds(),
    ));
    audit_log!(&state.storage, AuditEventType::TokenRefreshed, &claims.sub);

    let response = (
        StatusCode::OK,
        Json(Envelope::with_data(
            codes::TOKEN_REFRESHED,
            AuthenticatedUser::from(claims),
        )),
    )
        .into_response();
    with_bearer_header(response, &refreshed)
}

/// Change the caller's password.
///
/// Verifies the current password, rejects reuse, enforces the strength
/// policy and clears the temporary-password flag.
#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordBody,
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Missing fields, reused or weak password"),
        (status = 401, description = "Not authenticated or wrong current password"),
    )
)]
pub async fn change_password(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordBody>,
) -> Result<(StatusCode, Json<Envelope<()>>), ApiError> {
    let (current, new) = match (body.current_password, body.new_password) {
        (Some(current), Some(new)) if !current.is_empty() && !new.is_empty() => (current, new),
        _ => return Err(ApiError::validation(codes::VALIDATION_MISSING_FIELDS)),
    };

    let repo = UserRepository::new(&state.storage);
    let mut stored = repo
        .get(&user.user_id)
        .map_err(|_| ApiError::unauthorized(codes::AUTH_TOKEN_INVALID))?;

    if !password::verify(&current, &stored.password_hash) {
        return Err(ApiError::unauthorized(codes::INVALID_CREDENTIALS));
    }
    if new == current {
        return Err(ApiError::validation(codes::PASSWORD_REUSE));
    }
    if !password::validate_strength(&new) {
        return Err(ApiError::validation(codes::VALIDATION_WEAK_PASSWORD));
    }

    stored.password_hash = password::hash(&new).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        ApiError::internal()
    })?;
    stored.password_temporary = false;
    repo.update(&stored).map_err(|e| {
        tracing::error!(error = %e, "failed to update credential record");
        ApiError::internal()
    })?;

    audit_log!(&state.storage, AuditEventType::PasswordChanged, &stored.id);

    Ok((StatusCode::OK, Json(Envelope::of(codes::PASSWORD_CHANGED))))
}
