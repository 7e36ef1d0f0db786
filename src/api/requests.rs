// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LGPD request submission and listing.
//!
//! Submission is strictly ordered: the metadata record is created (and
//! durable) before sealing is attempted, so a reviewer can always see that
//! a request existed even if its content was lost to a transient failure.
//! A seal or persist failure after that point transitions the record to
//! FAILED; the caller never receives a half-created, perpetually-PENDING
//! request.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use crypto_box::PublicKey;
use uuid::Uuid;

use crate::{
    audit_log, crypto,
    auth::Auth,
    error::{codes, ApiError, Envelope},
    models::{cpf_hash, is_valid_cpf, RequestSummary, SealedRequestPayload, SubmitRequestBody, SubmitReceipt},
    state::AppState,
    storage::{
        AuditEvent, AuditEventType, AuditRepository, CompanyRepository, FileStore,
        PayloadRepository, RequestRepository, RequestStatus, RequestType, StoredRequest,
    },
};

/// Seal the payload and persist the blob. Any failure here is compensated
/// by the caller; the metadata record already exists.
fn seal_and_store(
    storage: &FileStore,
    request_id: &str,
    payload: &SealedRequestPayload,
    recipient: &PublicKey,
) -> Result<(), String> {
    let plaintext = serde_json::to_vec(payload).map_err(|e| e.to_string())?;
    let blob = crypto::seal(&plaintext, recipient).map_err(|e| e.to_string())?;
    PayloadRepository::new(storage)
        .store(request_id, &blob)
        .map_err(|e| e.to_string())
}

/// Submit an LGPD request.
#[utoipa::path(
    post,
    path = "/api/lgpd-requests",
    request_body = SubmitRequestBody,
    tag = "Requests",
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Request created; content sealed to the company key", body = SubmitReceipt),
        (status = 400, description = "Invalid payload, CPF, request type, or company not configured"),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Creation failed; the request is marked FAILED"),
    )
)]
pub async fn submit_request(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(body): Json<SubmitRequestBody>,
) -> Result<(StatusCode, Json<Envelope<SubmitReceipt>>), ApiError> {
    // Validate the payload before any side effect.
    let (type_label, reason, description, cpf) =
        match (body.request_type, body.reason, body.description, body.cpf) {
            (Some(label), Some(reason), Some(description), Some(cpf))
                if !label.is_empty()
                    && !reason.is_empty()
                    && !description.is_empty()
                    && !cpf.is_empty() =>
            {
                (label, reason, description, cpf)
            }
            _ => return Err(ApiError::validation(codes::VALIDATION_MISSING_FIELDS)),
        };

    let request_type = RequestType::from_label(&type_label)
        .ok_or_else(|| ApiError::validation(codes::VALIDATION_REQUEST_TYPE_INVALID))?;

    if !is_valid_cpf(&cpf) {
        return Err(ApiError::validation(codes::VALIDATION_CPF_INVALID));
    }

    // Resolve the sealing key. Without a configured company there is nothing
    // to encrypt against, so the whole submission fails up front.
    let company = CompanyRepository::new(&state.storage)
        .active()
        .map_err(|_| ApiError::dependency(codes::COMPANY_SETUP_REQUIRED))?;
    let recipient = crypto::parse_public_key(&company.public_key).map_err(|e| {
        tracing::error!(error = %e, company_id = %company.id, "stored company key is unusable");
        ApiError::internal()
    })?;

    // Metadata first: reviewers see that the request exists even if sealing
    // fails. Only the CPF hash is stored here.
    let record = StoredRequest {
        id: Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        request_type,
        status: RequestStatus::Pending,
        cpf_hash: cpf_hash(&cpf),
        created_at: Utc::now(),
        completed_at: None,
    };
    let requests = RequestRepository::new(&state.storage);
    requests.create(&record).map_err(|e| {
        tracing::error!(error = %e, "failed to create request metadata");
        ApiError::internal()
    })?;

    let payload = SealedRequestPayload {
        reason,
        description,
        cpf,
        request_type,
        user_email: user.email.clone(),
        submitted_at: record.created_at,
        request_id: record.id.clone(),
    };

    match seal_and_store(&state.storage, &record.id, &payload, &recipient) {
        Ok(()) => {
            audit_log!(
                &state.storage,
                AuditEventType::RequestSubmitted,
                &user.user_id,
                "request",
                &record.id
            );
            Ok((
                StatusCode::CREATED,
                Json(Envelope::with_data(
                    codes::REQUEST_CREATED,
                    SubmitReceipt {
                        request_id: record.id,
                        encrypted: true,
                        key_fingerprint: crypto::fingerprint(&recipient),
                    },
                )),
            ))
        }
        Err(cause) => {
            tracing::error!(request_id = %record.id, error = %cause, "sealing request payload failed");

            // Best effort: a failure to even mark FAILED is logged but must
            // not mask the original error returned to the caller.
            if let Err(mark_err) = requests.set_status(&record.id, RequestStatus::Failed) {
                tracing::error!(
                    request_id = %record.id,
                    error = %mark_err,
                    "failed to mark request FAILED after seal failure"
                );
            }

            let _ = AuditRepository::new(&state.storage).log(
                &AuditEvent::new(AuditEventType::RequestSealFailed)
                    .with_user(&user.user_id)
                    .with_resource("request", &record.id)
                    .failed(cause),
            );

            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::REQUEST_CREATE_FAILED,
            ))
        }
    }
}

/// List the caller's own request metadata.
#[utoipa::path(
    get,
    path = "/api/lgpd-requests",
    tag = "Requests",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's requests", body = [RequestSummary]),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn list_own_requests(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Envelope<Vec<RequestSummary>>>), ApiError> {
    let records = RequestRepository::new(&state.storage)
        .list_by_user(&user.user_id)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router;
    use crate::auth::{Role, TokenService};
    use crate::config::AuthSettings;
    use crate::storage::StoragePaths;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        Router,
    };
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app() -> (Router, AppState, TempDir) {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStore::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        let tokens =
            TokenService::new(&AuthSettings::new("requests-test-secret", 24, false)).unwrap();
        let state = AppState::new(storage, tokens);
        (router(state.clone()), state, temp)
    }

    /// Configure the company and return the off-platform secret key.
    fn configure_company(state: &AppState) -> (PublicKey, crypto_box::SecretKey) {
        let (public, secret) = crypto::generate_keypair();
        CompanyRepository::new(&state.storage)
            .configure(&crate::storage::StoredCompany {
                id: "company-1".to_string(),
                name: "Acme Ltda".to_string(),
                public_key: crypto::encode_public_key(&public),
                created_at: Utc::now(),
            })
            .unwrap();
        (public, secret)
    }

    fn subject_token(state: &AppState) -> String {
        state
            .tokens
            .issue("subject-1", "subject@example.com", Role::DataSubject)
            .unwrap()
    }

    fn submit_body() -> serde_json::Value {
        serde_json::json!({
            "type": "data_access",
            "reason": "R",
            "description": "D",
            "cpf": "123.456.789-00"
        })
    }

    async fn post_request(
        app: &Router,
        token: &str,
        body: serde_json::Value,
    ) -> (axum::http::StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/lgpd-requests")
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn submission_requires_authentication() {
        let (app, _state, _temp) = test_app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/lgpd-requests")
            .header("content-type", "application/json")
            .body(Body::from(submit_body().to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn submission_validates_payload() {
        let (app, state, _temp) = test_app();
        configure_company(&state);
        let token = subject_token(&state);

        let mut missing = submit_body();
        missing.as_object_mut().unwrap().remove("reason");
        let (status, body) = post_request(&app, &token, missing).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_MISSING_FIELDS");

        let mut bad_type = submit_body();
        bad_type["type"] = "data_download".into();
        let (status, body) = post_request(&app, &token, bad_type).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_REQUEST_TYPE_INVALID");

        let mut bad_cpf = submit_body();
        bad_cpf["cpf"] = "12345678900".into();
        let (status, body) = post_request(&app, &token, bad_cpf).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_CPF_INVALID");

        let mut zero_cpf = submit_body();
        zero_cpf["cpf"] = "000.000.000-00".into();
        let (status, body) = post_request(&app, &token, zero_cpf).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_CPF_INVALID");
    }

    #[tokio::test]
    async fn submission_fails_without_configured_company() {
        let (app, state, _temp) = test_app();
        let token = subject_token(&state);

        let (status, body) = post_request(&app, &token, submit_body()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "COMPANY_SETUP_REQUIRED");

        // No orphan metadata was created.
        let all = RequestRepository::new(&state.storage).list_all().unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn successful_submission_returns_receipt_and_seals_content() {
        let (app, state, _temp) = test_app();
        let (public, secret) = configure_company(&state);
        let token = subject_token(&state);

        let (status, body) = post_request(&app, &token, submit_body()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["code"], "REQUEST_CREATED");
        assert_eq!(body["data"]["encrypted"], true);
        assert_eq!(body["data"]["key_fingerprint"], crypto::fingerprint(&public));

        let request_id = body["data"]["request_id"].as_str().unwrap();

        // Metadata: PENDING, hashed CPF only.
        let record = RequestRepository::new(&state.storage)
            .get(request_id)
            .unwrap();
        assert_eq!(record.status, RequestStatus::Pending);
        assert_eq!(record.request_type, RequestType::Access);
        assert_eq!(record.user_id, "subject-1");
        assert_eq!(record.cpf_hash, cpf_hash("123.456.789-00"));

        // The blob is opaque to the platform but opens with the company's
        // off-platform secret key.
        let blob = PayloadRepository::new(&state.storage)
            .fetch(request_id)
            .unwrap();
        assert!(!blob.contains("123.456.789-00"));

        let opened = crypto::open(&blob, &secret).unwrap();
        let payload: SealedRequestPayload = serde_json::from_slice(&opened).unwrap();
        assert_eq!(payload.reason, "R");
        assert_eq!(payload.description, "D");
        assert_eq!(payload.cpf, "123.456.789-00");
        assert_eq!(payload.request_type, RequestType::Access);
        assert_eq!(payload.user_email, "subject@example.com");
        assert_eq!(payload.request_id, request_id);
    }

    #[tokio::test]
    async fn seal_failure_compensates_with_failed_status() {
        let (app, state, _temp) = test_app();
        configure_company(&state);
        let token = subject_token(&state);

        // Force the blob persist step to fail by replacing the payloads
        // directory with a regular file.
        let payloads_dir = state.storage.paths().payloads_dir();
        std::fs::remove_dir_all(&payloads_dir).unwrap();
        std::fs::write(&payloads_dir, b"not a directory").unwrap();

        let (status, body) = post_request(&app, &token, submit_body()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "REQUEST_CREATE_FAILED");

        // The metadata record exists and was transitioned to FAILED.
        let all = RequestRepository::new(&state.storage).list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, RequestStatus::Failed);
    }

    #[tokio::test]
    async fn listing_returns_only_own_requests() {
        let (app, state, _temp) = test_app();
        configure_company(&state);

        let mine = subject_token(&state);
        let other = state
            .tokens
            .issue("subject-2", "other@example.com", Role::DataSubject)
            .unwrap();

        post_request(&app, &mine, submit_body()).await;
        post_request(&app, &other, submit_body()).await;

        let request = Request::builder()
            .method("GET")
            .uri("/api/lgpd-requests")
            .header("authorization", format!("Bearer {mine}"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "REQUEST_LIST");

        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["user_id"], "subject-1");
        // Plaintext content never appears in metadata.
        assert!(items[0].get("reason").is_none());
        assert!(items[0].get("description").is_none());
    }
}
