// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LGPD request metadata repository.
//!
//! Only redaction-safe metadata lives here: the true content of a request
//! (reason, description, CPF) exists solely inside its sealed payload blob.
//! Each record is a separate JSON file under `requests/`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{FileStore, StorageError, StorageResult};

/// Canonical LGPD request types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Access,
    Deletion,
    Correction,
    Portability,
}

impl RequestType {
    /// Map a frontend label (or a canonical name) to a canonical type.
    /// An unmapped label is a validation error for the caller, never a
    /// silent default.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "data_access" | "ACCESS" => Some(RequestType::Access),
            "data_deletion" | "DELETION" => Some(RequestType::Deletion),
            "data_correction" | "CORRECTION" => Some(RequestType::Correction),
            "data_portability" | "PORTABILITY" => Some(RequestType::Portability),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestType::Access => write!(f, "ACCESS"),
            RequestType::Deletion => write!(f, "DELETION"),
            RequestType::Correction => write!(f, "CORRECTION"),
            RequestType::Portability => write!(f, "PORTABILITY"),
        }
    }
}

/// Canonical request lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl RequestStatus {
    /// Parse a canonical status name. Reviewer input only; no aliases.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "PENDING" => Some(RequestStatus::Pending),
            "PROCESSING" => Some(RequestStatus::Processing),
            "COMPLETED" => Some(RequestStatus::Completed),
            "FAILED" => Some(RequestStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "PENDING"),
            RequestStatus::Processing => write!(f, "PROCESSING"),
            RequestStatus::Completed => write!(f, "COMPLETED"),
            RequestStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// LGPD request metadata record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredRequest {
    /// Unique request identifier (UUID)
    pub id: String,
    /// Submitting user's ID
    pub user_id: String,
    /// Canonical request type
    pub request_type: RequestType,
    /// Lifecycle state
    pub status: RequestStatus,
    /// SHA-256 hex of the submitted CPF; the raw CPF is never stored here
    pub cpf_hash: String,
    /// When the request was submitted
    pub created_at: DateTime<Utc>,
    /// When the request was completed (set only while status is COMPLETED)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Repository for request metadata records.
pub struct RequestRepository<'a> {
    storage: &'a FileStore,
}

impl<'a> RequestRepository<'a> {
    pub fn new(storage: &'a FileStore) -> Self {
        Self { storage }
    }

    pub fn exists(&self, request_id: &str) -> bool {
        self.storage.exists(self.storage.paths().request(request_id))
    }

    pub fn get(&self, request_id: &str) -> StorageResult<StoredRequest> {
        let path = self.storage.paths().request(request_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("Request {request_id}")));
        }
        self.storage.read_json(path)
    }

    /// Create a new metadata record. The record must exist (and be durable)
    /// before any sealing of its payload is attempted.
    pub fn create(&self, request: &StoredRequest) -> StorageResult<()> {
        if self.exists(&request.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Request {}",
                request.id
            )));
        }
        self.storage
            .write_json(self.storage.paths().request(&request.id), request)
    }

    pub fn update(&self, request: &StoredRequest) -> StorageResult<()> {
        if !self.exists(&request.id) {
            return Err(StorageError::NotFound(format!("Request {}", request.id)));
        }
        self.storage
            .write_json(self.storage.paths().request(&request.id), request)
    }

    /// Transition a request to a new status.
    ///
    /// COMPLETED stamps the completion time; any other status clears it, so
    /// the status and the timestamp can never disagree.
    pub fn set_status(
        &self,
        request_id: &str,
        status: RequestStatus,
    ) -> StorageResult<StoredRequest> {
        let mut request = self.get(request_id)?;
        request.status = status;
        request.completed_at = if status == RequestStatus::Completed {
            Some(Utc::now())
        } else {
            None
        };
        self.update(&request)?;
        Ok(request)
    }

    /// List all requests submitted by a user.
    pub fn list_by_user(&self, user_id: &str) -> StorageResult<Vec<StoredRequest>> {
        let mut requests: Vec<StoredRequest> = self
            .scan()?
            .into_iter()
            .filter(|request| request.user_id == user_id)
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    /// List all requests (company triage view).
    pub fn list_all(&self) -> StorageResult<Vec<StoredRequest>> {
        let mut requests = self.scan()?;
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    fn scan(&self) -> StorageResult<Vec<StoredRequest>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().requests_dir(), "json")?;

        let mut requests = Vec::new();
        for id in ids {
            if let Ok(request) = self.get(&id) {
                requests.push(request);
            }
        }
        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStore) {
        let temp = TempDir::new().unwrap();
        let paths = StoragePaths::new(temp.path());
        let mut storage = FileStore::new(paths);
        storage.initialize().unwrap();
        (temp, storage)
    }

    fn test_request(id: &str, user_id: &str) -> StoredRequest {
        StoredRequest {
            id: id.to_string(),
            user_id: user_id.to_string(),
            request_type: RequestType::Access,
            status: RequestStatus::Pending,
            cpf_hash: "ab".repeat(32),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn label_mapping_covers_the_four_types() {
        assert_eq!(RequestType::from_label("data_access"), Some(RequestType::Access));
        assert_eq!(
            RequestType::from_label("data_deletion"),
            Some(RequestType::Deletion)
        );
        assert_eq!(
            RequestType::from_label("data_correction"),
            Some(RequestType::Correction)
        );
        assert_eq!(
            RequestType::from_label("data_portability"),
            Some(RequestType::Portability)
        );
        assert_eq!(RequestType::from_label("ACCESS"), Some(RequestType::Access));
        assert_eq!(RequestType::from_label("data_download"), None);
        assert_eq!(RequestType::from_label(""), None);
    }

    #[test]
    fn status_parsing_accepts_canonical_names_only() {
        assert_eq!(RequestStatus::from_label("PENDING"), Some(RequestStatus::Pending));
        assert_eq!(
            RequestStatus::from_label("COMPLETED"),
            Some(RequestStatus::Completed)
        );
        assert_eq!(RequestStatus::from_label("completed"), None);
        assert_eq!(RequestStatus::from_label("DONE"), None);
    }

    #[test]
    fn create_and_get_request() {
        let (_temp, storage) = setup();
        let repo = RequestRepository::new(&storage);

        let request = test_request("req-1", "user-1");
        repo.create(&request).unwrap();

        let loaded = repo.get("req-1").unwrap();
        assert_eq!(loaded, request);
    }

    #[test]
    fn duplicate_create_rejected() {
        let (_temp, storage) = setup();
        let repo = RequestRepository::new(&storage);

        repo.create(&test_request("req-1", "user-1")).unwrap();
        let result = repo.create(&test_request("req-1", "user-2"));
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[test]
    fn set_status_completed_stamps_timestamp() {
        let (_temp, storage) = setup();
        let repo = RequestRepository::new(&storage);
        repo.create(&test_request("req-1", "user-1")).unwrap();

        let updated = repo.set_status("req-1", RequestStatus::Completed).unwrap();
        assert_eq!(updated.status, RequestStatus::Completed);
        assert!(updated.completed_at.is_some());

        let reverted = repo.set_status("req-1", RequestStatus::Processing).unwrap();
        assert_eq!(reverted.status, RequestStatus::Processing);
        assert!(reverted.completed_at.is_none());
    }

    #[test]
    fn set_status_on_missing_request_fails() {
        let (_temp, storage) = setup();
        let repo = RequestRepository::new(&storage);
        let result = repo.set_status("missing", RequestStatus::Failed);
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn list_by_user_filters_and_sorts() {
        let (_temp, storage) = setup();
        let repo = RequestRepository::new(&storage);

        repo.create(&test_request("req-a", "user-1")).unwrap();
        repo.create(&test_request("req-b", "user-2")).unwrap();
        repo.create(&test_request("req-c", "user-1")).unwrap();

        let mine = repo.list_by_user("user-1").unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|r| r.user_id == "user-1"));

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 3);
    }
}
