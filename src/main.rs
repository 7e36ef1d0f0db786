// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr};

use chrono::Utc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use lgpd_portal_server::{
    api::router,
    auth::{password, Role, TokenService},
    config::{
        AuthSettings, ServerSettings, LOG_FORMAT_ENV, SEED_ADMIN_EMAIL_ENV,
        SEED_ADMIN_PASSWORD_ENV,
    },
    state::AppState,
    storage::{FileStore, StoragePaths, StoredUser, UserRepository},
};

#[tokio::main]
async fn main() {
    init_tracing();

    // Fail fast: a missing or (in production) short signing secret must stop
    // the process before it can issue a single token.
    let auth_settings = AuthSettings::from_env().expect("invalid auth configuration");
    let tokens = TokenService::new(&auth_settings).expect("invalid session token configuration");

    let server = ServerSettings::from_env();
    let mut storage = FileStore::new(StoragePaths::new(&server.data_dir));
    storage
        .initialize()
        .expect("failed to initialize data directory");

    seed_super_admin(&storage);

    let state = AppState::new(storage, tokens);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", server.host, server.port)
        .parse()
        .expect("failed to parse bind address");

    tracing::info!(%addr, "LGPD portal server listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app).await.expect("server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if env::var(LOG_FORMAT_ENV).as_deref() == Ok("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Bootstrap the super admin from the environment on first start.
///
/// The account is created with a temporary password so the operator is
/// forced through the change-password flow.
fn seed_super_admin(storage: &FileStore) {
    let (Ok(email), Ok(seed_password)) = (
        env::var(SEED_ADMIN_EMAIL_ENV),
        env::var(SEED_ADMIN_PASSWORD_ENV),
    ) else {
        return;
    };

    let repo = UserRepository::new(storage);
    if repo.find_by_email(&email).is_ok() {
        return;
    }

    let hashed = match password::hash(&seed_password) {
        Ok(hashed) => hashed,
        Err(e) => {
            tracing::error!(error = %e, "failed to hash seed admin password");
            return;
        }
    };

    let user = StoredUser {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash: hashed,
        role: Role::SuperAdmin,
        company_id: None,
        password_temporary: true,
        created_at: Utc::now(),
    };

    match repo.create(&user) {
        Ok(()) => tracing::info!(user_id = %user.id, "seeded super admin account"),
        Err(e) => tracing::error!(error = %e, "failed to seed super admin account"),
    }
}
