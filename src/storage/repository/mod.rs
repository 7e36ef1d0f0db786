// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the file store.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the FileStore for all file operations.

pub mod company;
pub mod payloads;
pub mod requests;
pub mod users;

pub use company::{CompanyRepository, StoredCompany};
pub use payloads::PayloadRepository;
pub use requests::{RequestRepository, RequestStatus, RequestType, StoredRequest};
pub use users::{StoredUser, UserRepository};
