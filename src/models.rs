// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures for the REST API, plus the CPF
//! validation helpers shared by the submission flow. Request bodies use
//! optional fields so missing input surfaces as a `VALIDATION_MISSING_FIELDS`
//! envelope rather than a framework rejection.
//!
//! Response DTOs are the only shapes that cross the HTTP boundary; storage
//! records (and their password hashes) never do.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

use crate::auth::Role;
use crate::storage::{RequestStatus, RequestType, StoredRequest, StoredUser};

// =============================================================================
// CPF helpers
// =============================================================================

/// Reserved all-zero CPF, invalid for identity verification.
pub const CPF_ZERO_SENTINEL: &str = "000.000.000-00";

/// Fixed `ddd.ddd.ddd-dd` CPF shape.
static CPF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").expect("cpf regex compiles"));

/// Check the CPF shape and reject the all-zero sentinel.
pub fn is_valid_cpf(cpf: &str) -> bool {
    CPF_RE.is_match(cpf) && cpf != CPF_ZERO_SENTINEL
}

/// One-way hash of a CPF for the metadata record; the raw CPF exists only
/// inside the sealed payload.
pub fn cpf_hash(cpf: &str) -> String {
    let digest = Sha256::digest(cpf.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// =============================================================================
// Auth request bodies
// =============================================================================

/// Body for POST /api/auth/register.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterBody {
    pub email: Option<String>,
    pub password: Option<String>,
    /// Self-registration is limited to `data_subject`.
    #[serde(rename = "userType")]
    pub user_type: Option<String>,
}

/// Body for POST /api/auth/login.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body for POST /api/auth/change-password.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordBody {
    #[serde(rename = "currentPassword")]
    pub current_password: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

// =============================================================================
// Request submission bodies
// =============================================================================

/// Body for POST /api/lgpd-requests.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitRequestBody {
    /// Frontend label for the request type (e.g. `data_access`).
    #[serde(rename = "type")]
    pub request_type: Option<String>,
    pub reason: Option<String>,
    pub description: Option<String>,
    pub cpf: Option<String>,
}

/// Body for PATCH /api/company/lgpd-requests.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusBody {
    #[serde(rename = "requestId")]
    pub request_id: Option<String>,
    /// One of the four canonical status values.
    pub status: Option<String>,
}

/// Body for POST /api/company/setup.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CompanySetupBody {
    pub name: Option<String>,
    /// Base64-encoded X25519 public key; the private key stays with the
    /// company (e.g. in a password manager).
    #[serde(rename = "publicKey")]
    pub public_key: Option<String>,
}

/// Body for POST /api/admin/users.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProvisionUserBody {
    pub email: Option<String>,
    /// `admin` or `employee`.
    pub role: Option<String>,
    #[serde(rename = "temporaryPassword")]
    pub temporary_password: Option<String>,
}

// =============================================================================
// Response DTOs
// =============================================================================

/// Account info returned by login, provisioning and the admin user list.
/// Deliberately excludes the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub password_temporary: bool,
}

impl From<&StoredUser> for UserInfo {
    fn from(user: &StoredUser) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            password_temporary: user.password_temporary,
        }
    }
}

/// Request metadata as shown to submitters and reviewers.
#[derive(Debug, Serialize, ToSchema)]
pub struct RequestSummary {
    pub id: String,
    pub user_id: String,
    pub request_type: RequestType,
    pub status: RequestStatus,
    pub cpf_hash: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<StoredRequest> for RequestSummary {
    fn from(request: StoredRequest) -> Self {
        Self {
            id: request.id,
            user_id: request.user_id,
            request_type: request.request_type,
            status: request.status,
            cpf_hash: request.cpf_hash,
            created_at: request.created_at,
            completed_at: request.completed_at,
        }
    }
}

/// Receipt for a successful submission. The fingerprint lets the submitter
/// audit which key their payload was sealed to.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitReceipt {
    pub request_id: String,
    pub encrypted: bool,
    pub key_fingerprint: String,
}

/// Company info for the dashboard; exposes the key fingerprint, not the key.
#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyInfo {
    pub id: String,
    pub name: String,
    pub key_fingerprint: String,
    pub created_at: DateTime<Utc>,
}

/// A sealed payload blob handed to a reviewer for off-platform decryption.
#[derive(Debug, Serialize, ToSchema)]
pub struct PayloadEnvelope {
    pub request_id: String,
    pub blob: String,
}

// =============================================================================
// Sealed payload document
// =============================================================================

/// The document sealed to the company key at submission time. This is the
/// only place the raw reason, description and CPF ever exist at rest - as
/// ciphertext.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SealedRequestPayload {
    pub reason: String,
    pub description: String,
    pub cpf: String,
    pub request_type: RequestType,
    pub user_email: String,
    pub submitted_at: DateTime<Utc>,
    pub request_id: String,
}
