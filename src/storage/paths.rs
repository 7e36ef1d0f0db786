// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the storage layout.

use std::path::{Path, PathBuf};

/// Default root directory for persistent storage.
pub const DATA_ROOT: &str = "./data";

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persistent data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all credential records.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific credential record.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    // ========== Company Paths ==========

    /// Directory for the company record.
    pub fn company_dir(&self) -> PathBuf {
        self.root.join("company")
    }

    /// Path to the single active company record (single-tenant).
    pub fn company(&self) -> PathBuf {
        self.company_dir().join("active.json")
    }

    // ========== Request Paths ==========

    /// Directory containing all LGPD request metadata records.
    pub fn requests_dir(&self) -> PathBuf {
        self.root.join("requests")
    }

    /// Path to a specific request metadata record.
    pub fn request(&self, request_id: &str) -> PathBuf {
        self.requests_dir().join(format!("{request_id}.json"))
    }

    // ========== Payload Paths ==========

    /// Directory containing sealed request payloads.
    pub fn payloads_dir(&self) -> PathBuf {
        self.root.join("payloads")
    }

    /// Path to a sealed payload blob, keyed 1:1 by request id.
    pub fn payload(&self, request_id: &str) -> PathBuf {
        self.payloads_dir().join(format!("{request_id}.b64"))
    }

    // ========== Audit Log Paths ==========

    /// Directory containing audit logs.
    pub fn audit_dir(&self) -> PathBuf {
        self.root.join("audit")
    }

    /// Directory for a specific date's audit logs.
    pub fn audit_date_dir(&self, date: &str) -> PathBuf {
        self.audit_dir().join(date)
    }

    /// Path to a daily audit events file (JSONL format).
    pub fn audit_events_file(&self, date: &str) -> PathBuf {
        self.audit_date_dir(date).join("events.jsonl")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_use_data_root() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new("./data"));
    }

    #[test]
    fn custom_root_for_testing() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(paths.root(), Path::new("/tmp/test-data"));
        assert_eq!(
            paths.user("user-123"),
            PathBuf::from("/tmp/test-data/users/user-123.json")
        );
    }

    #[test]
    fn entity_paths_are_correct() {
        let paths = StoragePaths::new("/data");
        assert_eq!(paths.company(), PathBuf::from("/data/company/active.json"));
        assert_eq!(
            paths.request("req-1"),
            PathBuf::from("/data/requests/req-1.json")
        );
        assert_eq!(
            paths.payload("req-1"),
            PathBuf::from("/data/payloads/req-1.b64")
        );
        assert_eq!(
            paths.audit_events_file("2026-08-06"),
            PathBuf::from("/data/audit/2026-08-06/events.jsonl")
        );
    }
}
