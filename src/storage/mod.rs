// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! File-backed persistence for the portal's records. Every record is a JSON
//! file written atomically; sealed request payloads are stored as opaque
//! blobs that this layer can never decrypt (the company's private key is
//! kept off-platform).
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/
//!   users/
//!     {user_id}.json       # Credential records (bcrypt hash, role, flags)
//!   company/
//!     active.json          # Single active company + sealing public key
//!   requests/
//!     {request_id}.json    # Request metadata (status, CPF hash - no content)
//!   payloads/
//!     {request_id}.b64     # Sealed-box ciphertext, 1:1 with requests
//!   audit/
//!     {date}/events.jsonl  # Daily audit logs
//! ```

pub mod audit;
pub mod fs;
pub mod paths;
pub mod repository;

pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use fs::{FileStore, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{
    CompanyRepository, PayloadRepository, RequestRepository, RequestStatus, RequestType,
    StoredCompany, StoredRequest, StoredUser, UserRepository,
};
