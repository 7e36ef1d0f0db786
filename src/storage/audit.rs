// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Audit logging for security-sensitive operations.
//!
//! Authentication events, submissions, status changes and administrative
//! actions are appended to a daily JSONL file. Audit entries carry only
//! metadata; plaintext request content never reaches this log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FileStore, StorageResult};

/// Types of auditable events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    // Account events
    UserRegistered,
    UserProvisioned,
    PasswordChanged,

    // Session events
    LoginSucceeded,
    LoginFailed,
    TokenRefreshed,

    // Request lifecycle events
    RequestSubmitted,
    RequestSealFailed,
    RequestStatusChanged,
    PayloadRetrieved,

    // Company events
    CompanyConfigured,
}

/// An audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditEvent {
    /// Unique event ID.
    pub event_id: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Type of event.
    pub event_type: AuditEventType,
    /// User who triggered the event (if known).
    pub user_id: Option<String>,
    /// Resource affected (request_id, user_id, company_id).
    pub resource_id: Option<String>,
    /// Resource type (request, user, company).
    pub resource_type: Option<String>,
    /// Additional details as JSON.
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error message if the operation failed.
    pub error: Option<String>,
}

impl AuditEvent {
    /// Create a new audit event.
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            user_id: None,
            resource_id: None,
            resource_type: None,
            details: None,
            success: true,
            error: None,
        }
    }

    /// Set the user ID.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the resource.
    pub fn with_resource(
        mut self,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Add details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Mark as failed with an error message.
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }
}

/// Repository for audit events.
pub struct AuditRepository<'a> {
    storage: &'a FileStore,
}

impl<'a> AuditRepository<'a> {
    pub fn new(storage: &'a FileStore) -> Self {
        Self { storage }
    }

    /// Log an audit event.
    ///
    /// Events are appended to a daily log file in JSONL format.
    pub fn log(&self, event: &AuditEvent) -> StorageResult<()> {
        let date = event.timestamp.format("%Y-%m-%d").to_string();
        let path = self.storage.paths().audit_events_file(&date);

        let mut content = self.storage.read_raw(&path).unwrap_or_default();

        let event_json = serde_json::to_string(event).map_err(|e| {
            super::StorageError::Serialization(format!("Failed to serialize audit event: {e}"))
        })?;

        if !content.is_empty() && !content.ends_with(b"\n") {
            content.push(b'\n');
        }
        content.extend_from_slice(event_json.as_bytes());
        content.push(b'\n');

        self.storage.write_raw(&path, &content)
    }

    /// Read audit events for a specific date (`YYYY-MM-DD`).
    pub fn read_events(&self, date: &str) -> StorageResult<Vec<AuditEvent>> {
        let path = self.storage.paths().audit_events_file(date);
        let content = self.storage.read_raw(&path)?;

        let content_str = String::from_utf8(content).map_err(|e| {
            super::StorageError::Serialization(format!("Invalid UTF-8 in audit log: {e}"))
        })?;

        let mut events = Vec::new();
        for line in content_str.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let event: AuditEvent = serde_json::from_str(line).map_err(|e| {
                super::StorageError::Serialization(format!(
                    "Failed to deserialize audit event: {e}"
                ))
            })?;
            events.push(event);
        }

        Ok(events)
    }
}

/// Helper macro for logging audit events; failures to log never fail the
/// operation being audited.
#[macro_export]
macro_rules! audit_log {
    ($storage:expr, $event_type:expr, $user_id:expr) => {{
        let repo = $crate::storage::AuditRepository::new($storage);
        let event = $crate::storage::AuditEvent::new($event_type).with_user($user_id);
        let _ = repo.log(&event);
    }};
    ($storage:expr, $event_type:expr, $user_id:expr, $resource_type:expr, $resource_id:expr) => {{
        let repo = $crate::storage::AuditRepository::new($storage);
        let event = $crate::storage::AuditEvent::new($event_type)
            .with_user($user_id)
            .with_resource($resource_type, $resource_id);
        let _ = repo.log(&event);
    }};
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
    fn create_audit_event() {
        let event = AuditEvent::new(AuditEventType::RequestSubmitted)
            .with_user("user-123")
            .with_resource("request", "req-abc");

        assert_eq!(event.event_type, AuditEventType::RequestSubmitted);
        assert_eq!(event.user_id, Some("user-123".to_string()));
        assert_eq!(event.resource_type, Some("request".to_string()));
        assert_eq!(event.resource_id, Some("req-abc".to_string()));
        assert!(event.success);
    }

    #[test]
    fn failed_event() {
        let event = AuditEvent::new(AuditEventType::RequestSealFailed)
            .with_user("user-123")
            .failed("sealed-box encryption failed");

        assert!(!event.success);
        assert_eq!(
            event.error,
            Some("sealed-box encryption failed".to_string())
        );
    }

    #[test]
    fn log_and_read_events() {
        let (_temp, storage) = setup();
        let repo = AuditRepository::new(&storage);

        let event1 = AuditEvent::new(AuditEventType::LoginSucceeded).with_user("user-1");
        let event2 = AuditEvent::new(AuditEventType::RequestSubmitted)
            .with_user("user-1")
            .with_resource("request", "req-1");

        repo.log(&event1).unwrap();
        repo.log(&event2).unwrap();

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let events = repo.read_events(&today).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, AuditEventType::LoginSucceeded);
        assert_eq!(events[1].event_type, AuditEventType::RequestSubmitted);
    }

    #[test]
    fn read_events_for_empty_date_errors() {
        let (_temp, storage) = setup();
        let repo = AuditRepository::new(&storage);
        assert!(repo.read_events("1999-01-01").is_err());
    }
}
