// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Company record repository.
//!
//! Single-tenant: one active company per deployment, stored at
//! `company/active.json`. Its public key is the sole sealing target for all
//! request payloads created while it is active; the matching private key
//! never exists on the platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{FileStore, StorageError, StorageResult};

/// The active company record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredCompany {
    /// Unique company identifier (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Base64-encoded X25519 public key all payloads are sealed to
    pub public_key: String,
    /// When the company was configured
    pub created_at: DateTime<Utc>,
}

/// Repository for the single active company.
pub struct CompanyRepository<'a> {
    storage: &'a FileStore,
}

impl<'a> CompanyRepository<'a> {
    pub fn new(storage: &'a FileStore) -> Self {
        Self { storage }
    }

    pub fn is_configured(&self) -> bool {
        self.storage.exists(self.storage.paths().company())
    }

    /// Fetch the active company, or `NotFound` when setup has not run.
    pub fn active(&self) -> StorageResult<StoredCompany> {
        let path = self.storage.paths().company();
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound("Active company".to_string()));
        }
        self.storage.read_json(path)
    }

    /// Configure the company. Runs once per deployment; a second attempt is
    /// rejected rather than silently re-keying existing payloads.
    pub fn configure(&self, company: &StoredCompany) -> StorageResult<()> {
        if self.is_configured() {
            return Err(StorageError::AlreadyExists("Active company".to_string()));
        }
        self.storage
            .write_json(self.storage.paths().company(), company)
    }
}
