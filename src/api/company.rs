// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Company-side endpoints: setup, triage listing, status transitions and
//! sealed payload retrieval.
//!
//! All routes require company staff (`role in {admin, employee}`). The
//! sealed blobs handed out here are decrypted off-platform with the
//! company's private key; this service can only move ciphertext around.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit_log, crypto,
    auth::CompanyStaff,
    error::{codes, ApiError, Envelope},
    models::{CompanyInfo, CompanySetupBody, PayloadEnvelope, RequestSummary, UpdateStatusBody},
    state::AppState,
    storage::{
        AuditEvent, AuditEventType, AuditRepository, CompanyRepository, PayloadRepository,
        RequestRepository, RequestStatus, StorageError, StoredCompany,
    },
};

/// Configure the single active company and its sealing key.
#[utoipa::path(
    post,
    path = "/api/company/setup",
    request_body = CompanySetupBody,
    tag = "Company",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Company configured", body = CompanyInfo),
        (status = 400, description = "Missing fields or unusable public key"),
        (status = 403, description = "Caller is not company staff"),
        (status = 409, description = "A company is already configured"),
    )
)]
pub async fn setup_company(
    CompanyStaff(user): CompanyStaff,
    State(state): State<AppState>,
    Json(body): Json<CompanySetupBody>,
) -> Result<(StatusCode, Json<Envelope<CompanyInfo>>), ApiError> {
    let (name, public_key) = match (body.name, body.public_key) {
        (Some(name), Some(key)) if !name.is_empty() && !key.is_empty() => (name, key),
        _ => return Err(ApiError::validation(codes::VALIDATION_MISSING_FIELDS)),
    };

    // The key must decode to a usable X25519 key before anything persists.
    let parsed = crypto::parse_public_key(&public_key)
        .map_err(|_| ApiError::validation(codes::VALIDATION_PUBLIC_KEY_INVALID))?;

    let company = StoredCompany {
        id: Uuid::new_v4().to_string(),
        name,
        public_key,
        created_at: Utc::now(),
    };

    CompanyRepository::new(&state.storage)
        .configure(&company)
        .map_err(|e| match e {
            StorageError::AlreadyExists(_) => ApiError::conflict(codes::COMPANY_EXISTS),
            other => {
                tracing::error!(error = %other, "failed to persist company record");
                ApiError::internal()
            }
        })?;

    audit_log!(
        &state.storage,
        AuditEventType::CompanyConfigured,
        &user.user_id,
        "company",
        &company.id
    );

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_data(
            codes::COMPANY_CREATED,
            CompanyInfo {
                id: company.id,
                name: company.name,
                key_fingerprint: crypto::fingerprint(&parsed),
                created_at: company.created_at,
            },
        )),
    ))
}

/// Fetch the active company and its key fingerprint.
#[utoipa::path(
    get,
    path = "/api/company",
    tag = "Company",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Active company", body = CompanyInfo),
        (status = 400, description = "Company setup has not run"),
        (status = 403, description = "Caller is not company staff"),
    )
)]
pub async fn company_info(
    CompanyStaff(_user): CompanyStaff,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Envelope<CompanyInfo>>), ApiError> {
    let company = CompanyRepository::new(&state.storage)
        .active()
        .map_err(|_| ApiError::dependency(codes::COMPANY_SETUP_REQUIRED))?;

    let parsed = crypto::parse_public_key(&company.public_key).map_err(|e| {
        tracing::error!(error = %e, company_id = %company.id, "stored company key is unusable");
        ApiError::internal()
    })?;

    Ok((
        StatusCode::OK,
        Json(Envelope::with_data(
            codes::COMPANY_INFO,
            CompanyInfo {
                id: company.id,
                name: company.name,
                key_fingerprint: crypto::fingerprint(&parsed),
                created_at: company.created_at,
            },
        )),
    ))
}

/// List all request metadata for triage.
#[utoipa::path(
    get,
    path = "/api/company/lgpd-requests",
    tag = "Company",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All requests", body = [RequestSummary]),
        (status = 403, description = "Caller is not company staff"),
    )
)]
pub async fn list_requests(
    CompanyStaff(_user): CompanyStaff,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Envelope<Vec<RequestSummary>>>), ApiError> {
    let records = RequestRepository::new(&state.storage)
        .list_all()
        .map_err(|e| {
            tracing::error!(error = %e, "failed to list requests");
            ApiError::internal()
        })?;

    Ok((
        StatusCode::OK,
        Json(Envelope::with_data(
            codes::REQUEST_LIST,
            records.into_iter().map(RequestSummary::from).collect(),
        )),
    ))
}

/// Transition a request to a new canonical status.
#[utoipa::path(
    patch,
    path = "/api/company/lgpd-requests",
    request_body = UpdateStatusBody,
    tag = "Company",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Status updated", body = RequestSummary),
        (status = 400, description = "Missing fields or non-canonical status"),
        (status = 403, description = "Caller is not company staff"),
        (status = 404, description = "No such request"),
    )
)]
pub async fn update_status(
    CompanyStaff(user): CompanyStaff,
    State(state): State<AppState>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<(StatusCode, Json<Envelope<RequestSummary>>), ApiError> {
    let (request_id, status_label) = match (body.request_id, body.status) {
        (Some(id), Some(status)) if !id.is_empty() && !status.is_empty() => (id, status),
        _ => return Err(ApiError::validation(codes::VALIDATION_MISSING_FIELDS)),
    };

    let status = RequestStatus::from_label(&status_label)
        .ok_or_else(|| ApiError::validation(codes::VALIDATION_STATUS_INVALID))?;

    let repo = RequestRepository::new(&state.storage);
    let previous = repo
        .get(&request_id)
        .map_err(|_| ApiError::not_found(codes::REQUEST_NOT_FOUND))?
        .status;

    let updated = repo.set_status(&request_id, status).map_err(|e| {
        tracing::error!(error = %e, request_id = %request_id, "failed to update status");
        ApiError::internal()
    })?;

    let _ = AuditRepository::new(&state.storage).log(
        &AuditEvent::new(AuditEventType::RequestStatusChanged)
            .with_user(&user.user_id)
            .with_resource("request", &request_id)
            .with_details(serde_json::json!({
                "from": previous.to_string(),
                "to": status.to_string(),
            })),
    );

    Ok((
        StatusCode::OK,
        Json(Envelope::with_data(
            codes::STATUS_UPDATED,
            RequestSummary::from(updated),
        )),
    ))
}

/// Fetch the sealed payload for a request, for off-platform decryption.
#[utoipa::path(
    get,
    path = "/api/company/lgpd-requests/{request_id}/payload",
    params(("request_id" = String, Path, description = "Request identifier")),
    tag = "Company",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Opaque sealed blob", body = PayloadEnvelope),
        (status = 403, description = "Caller is not company staff"),
        (status = 404, description = "No payload for this request"),
    )
)]
pub async fn fetch_payload(
    CompanyStaff(user): CompanyStaff,
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<(StatusCode, Json<Envelope<PayloadEnvelope>>), ApiError> {
    let blob = PayloadRepository::new(&state.storage)
        .fetch(&request_id)
        .map_err(|_| ApiError::not_found(codes::PAYLOAD_NOT_FOUND))?;

    audit_log!(
        &state.storage,
        AuditEventType::PayloadRetrieved,
        &user.user_id,
        "request",
        &request_id
    );

    Ok((
        StatusCode::OK,
        Json(Envelope::with_data(
            codes::PAYLOAD_RETRIEVED,
            PayloadEnvelope { request_id, blob },
        )),
    ))
}
