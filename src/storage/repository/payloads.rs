// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sealed payload repository.
//!
//! One blob per request, keyed by request id, written once and never
//! mutated. Blobs are opaque sealed-box ciphertext; this layer cannot
//! decrypt them and never tries.

use super::super::{FileStore, StorageError, StorageResult};

/// Repository for sealed payload blobs.
pub struct PayloadRepository<'a> {
    storage: &'a FileStore,
}

impl<'a> PayloadRepository<'a> {
    pub fn new(storage: &'a FileStore) -> Self {
        Self { storage }
    }

    pub fn exists(&self, request_id: &str) -> bool {
        self.storage.exists(self.storage.paths().payload(request_id))
    }

    /// Store the blob for a request. Write-once: the 1:1 pairing with the
    /// metadata record means a second write for the same id is an error.
    pub fn store(&self, request_id: &str, blob: &str) -> StorageResult<()> {
        if self.exists(request_id) {
            return Err(StorageError::AlreadyExists(format!(
                "Payload for request {request_id}"
            )));
        }
        self.storage
            .write_raw(self.storage.paths().payload(request_id), blob.as_bytes())
    }

    /// Fetch the blob for a request.
    pub fn fetch(&self, request_id: &str) -> StorageResult<String> {
        let path = self.storage.paths().payload(request_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!(
                "Payload for request {request_id}"
            )));
        }
        let bytes = self.storage.read_raw(path)?;
        String::from_utf8(bytes)
            .map_err(|e| StorageError::Serialization(format!("Invalid payload encoding: {e}")))
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

    #[test]
    fn store_and_fetch_round_trips() {
        let (_temp, storage) = setup();
        let repo = PayloadRepository::new(&storage);

        repo.store("req-1", "c2VhbGVkLWJsb2I=").unwrap();
        assert!(repo.exists("req-1"));
        assert_eq!(repo.fetch("req-1").unwrap(), "c2VhbGVkLWJsb2I=");
    }

    #[test]
    fn second_store_for_same_request_rejected() {
        let (_temp, storage) = setup();
        let repo = PayloadRepository::new(&storage);

        repo.store("req-1", "Zmlyc3Q=").unwrap();
        let result = repo.store("req-1", "c2Vjb25k");
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));

        // The original blob is untouched.
        assert_eq!(repo.fetch("req-1").unwrap(), "Zmlyc3Q=");
    }

    #[test]
    fn fetch_missing_payload_is_not_found() {
        let (_temp, storage) = setup();
        let repo = PayloadRepository::new(&storage);
        assert!(matches!(
            repo.fetch("missing"),
            Err(StorageError::NotFound(_))
        ));
    }
}
