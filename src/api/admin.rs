// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Super-admin endpoints: company representative provisioning, account
//! listing and audit queries.
//!
//! All routes require the super admin role exactly; an admin or employee
//! gets a 403 with the distinct `SUPER_ADMIN_REQUIRED` tag.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    audit_log,
    auth::{password, Role, SuperAdminOnly},
    error::{codes, ApiError, Envelope},
    models::{ProvisionUserBody, UserInfo},
    state::AppState,
    storage::{
        AuditEvent, AuditRepository, AuditEventType, CompanyRepository, StorageError, StoredUser,
        UserRepository,
    },
};

/// Provision a company representative account.
///
/// The account starts with a temporary password the representative must
/// change at first login.
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = ProvisionUserBody,
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Account created", body = UserInfo),
        (status = 400, description = "Missing fields, invalid email/role or weak password"),
        (status = 403, description = "Caller is not the super admin"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn provision_user(
    SuperAdminOnly(admin): SuperAdminOnly,
    State(state): State<AppState>,
    Json(body): Json<ProvisionUserBody>,
) -> Result<(StatusCode, Json<Envelope<UserInfo>>), ApiError> {
    let (email, role_label, temporary_password) =
        match (body.email, body.role, body.temporary_password) {
            (Some(email), Some(role), Some(password))
                if !email.is_empty() && !role.is_empty() && !password.is_empty() =>
            {
                (email, role, password)
            }
            _ => return Err(ApiError::validation(codes::VALIDATION_MISSING_FIELDS)),
        };

    if !password::is_valid_email(&email) {
        return Err(ApiError::validation(codes::VALIDATION_EMAIL_INVALID));
    }

    // Provisioning creates company representatives only; data subjects
    // self-register and there is exactly one super admin.
    let role = Role::from_str(&role_label)
        .filter(|role| role.is_company_staff())
        .ok_or_else(|| ApiError::validation(codes::VALIDATION_ROLE_INVALID))?;

    if !password::validate_strength(&temporary_password) {
        return Err(ApiError::validation(codes::VALIDATION_WEAK_PASSWORD));
    }

    let repo = UserRepository::new(&state.storage);
    let hashed = password::hash(&temporary_password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        ApiError::internal()
    })?;

    let user = StoredUser {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash: hashed,
        role,
        company_id: CompanyRepository::new(&state.storage)
            .active()
            .ok()
            .map(|company| company.id),
        password_temporary: true,
        created_at: Utc::now(),
    };

    repo.create(&user).map_err(|e| match e {
        StorageError::AlreadyExists(_) => ApiError::conflict(codes::USER_EXISTS),
        other => {
            tracing::error!(error = %other, "failed to persist credential record");
            ApiError::internal()
        }
    })?;

    audit_log!(
        &state.storage,
        AuditEventType::UserProvisioned,
        &admin.user_id,
        "user",
        &user.id
    );

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_data(
            codes::USER_PROVISIONED,
            UserInfo::from(&user),
        )),
    ))
}

/// List all accounts. Password hashes never leave the storage layer.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All accounts", body = [UserInfo]),
        (status = 403, description = "Caller is not the super admin"),
    )
)]
pub async fn list_users(
    SuperAdminOnly(_admin): SuperAdminOnly,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Envelope<Vec<UserInfo>>>), ApiError> {
    let users = UserRepository::new(&state.storage).list_all().map_err(|e| {
        tracing::error!(error = %e, "failed to list users");
        ApiError::internal()
    })?;

    Ok((
        StatusCode::OK,
        Json(Envelope::with_data(
            codes::USER_LIST,
            users.iter().map(UserInfo::from).collect(),
        )),
    ))
}

/// Query parameters for audit log queries.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AuditQuery {
    /// Date to read events for (`YYYY-MM-DD`).
    pub date: String,
}

/// Read audit events for a date.
#[utoipa::path(
    get,
    path = "/api/admin/audit",
    params(AuditQuery),
    tag = "Admin",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Events for the date", body = [AuditEvent]),
        (status = 403, description = "Caller is not the super admin"),
    )
)]
pub async fn audit_events(
    SuperAdminOnly(_admin): SuperAdminOnly,
    State(state): State<AppState>,
    Query(params): Query<AuditQuery>,
) -> Result<(StatusCode, Json<Envelope<Vec<AuditEvent>>>), ApiError> {
    let events = match AuditRepository::new(&state.storage).read_events(&params.date) {
        Ok(events) => events,
        // No log file for that date means no events, not an error.
        Err(StorageError::NotFound(_)) => Vec::new(),
        Err(e) => {
            tracing::error!(error = %e, date = %params.date, "failed to read audit log");
            return Err(ApiError::internal());
        }
    };

    Ok((
        StatusCode::OK,
        Json(Envelope::with_data(codes::AUDIT_EVENTS, events)),
    ))
}
