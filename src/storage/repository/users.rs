// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential record repository.
//!
//! Each user is stored as a separate JSON file under `users/`. The stored
//! password hash never crosses the API boundary; handlers convert to
//! response DTOs that do not carry it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{FileStore, StorageError, StorageResult};
use crate::auth::Role;

/// Credential record for one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Email address, unique case-insensitively
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Role assigned at registration or provisioning time
    pub role: Role,
    /// Company the account belongs to (company staff only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    /// Set for provisioned accounts until the first password change
    pub password_temporary: bool,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Repository for credential records.
pub struct UserRepository<'a> {
    storage: &'a FileStore,
}

impl<'a> UserRepository<'a> {
    pub fn new(storage: &'a FileStore) -> Self {
        Self { storage }
    }

    pub fn exists(&self, user_id: &str) -> bool {
        self.storage.exists(self.storage.paths().user(user_id))
    }

    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        let path = self.storage.paths().user(user_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.storage.read_json(path)
    }

    /// Look up a user by email, case-insensitively.
    pub fn find_by_email(&self, email: &str) -> StorageResult<StoredUser> {
        let ids = self
            .storage
            .list_files(self.storage.paths().users_dir(), "json")?;

        for id in ids {
            if let Ok(user) = self.get(&id) {
                if user.email.eq_ignore_ascii_case(email) {
                    return Ok(user);
                }
            }
        }

        Err(StorageError::NotFound(format!("User with email {email}")))
    }

    /// Create a new credential record.
    ///
    /// Email uniqueness is enforced before insert; an existing record is
    /// never overwritten through this path.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        if self.exists(&user.id) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.id)));
        }
        if self.find_by_email(&user.email).is_ok() {
            return Err(StorageError::AlreadyExists(format!(
                "User with email {}",
                user.email
            )));
        }
        self.storage
            .write_json(self.storage.paths().user(&user.id), user)
    }

    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        if !self.exists(&user.id) {
            return Err(StorageError::NotFound(format!("User {}", user.id)));
        }
        self.storage
            .write_json(self.storage.paths().user(&user.id), user)
    }

    /// List all accounts (super admin view).
    pub fn list_all(&self) -> StorageResult<Vec<StoredUser>> {
        let ids = self
            .storage
            .list_files(self.storage.paths().users_dir(), "json")?;

        let mut users = Vec::new();
        for id in ids {
            if let Ok(user) = self.get(&id) {
                users.push(user);
            }
        }
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }
}
