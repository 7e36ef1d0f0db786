// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::storage::FileStore;

/// Shared application state.
///
/// The only process-wide state is configuration: the token service holds the
/// signing secret, and the file store holds the data root. Neither caches
/// records; every read goes through the storage collaborator, so request
/// handlers need no cross-request coordination.
#[derive(Clone)]
pub struct AppState {
    pub storage: FileStore,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(storage: FileStore, tokens: TokenService) -> Self {
        Self {
            storage,
            tokens: Arc::new(tokens),
        }
    }
}
