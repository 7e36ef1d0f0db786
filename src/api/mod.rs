// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{page_gate, AuthenticatedUser, Role},
    models::{
        ChangePasswordBody, CompanyInfo, CompanySetupBody, LoginBody, PayloadEnvelope,
        ProvisionUserBody, RegisterBody, RequestSummary, SubmitReceipt, SubmitRequestBody,
        UpdateStatusBody, UserInfo,
    },
    state::AppState,
    storage::{AuditEvent, AuditEventType, RequestStatus, RequestType},
};

pub mod admin;
pub mod auth;
pub mod company;
pub mod health;
pub mod requests;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/verify", get(auth::verify).post(auth::verify))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/change-password", post(auth::change_password))
        .route(
            "/lgpd-requests",
            get(requests::list_own_requests).post(requests::submit_request),
        )
        .route("/company", get(company::company_info))
        .route("/company/setup", post(company::setup_company))
        .route(
            "/company/lgpd-requests",
            get(company::list_requests).patch(company::update_status),
        )
        .route(
            "/company/lgpd-requests/{request_id}/payload",
            get(company::fetch_payload),
        )
        .route(
            "/admin/users",
            get(admin::list_users).post(admin::provision_user),
        )
        .route("/admin/audit", get(admin::audit_events))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Page navigations are gated at the edge; API routes guard
        // themselves through extractors.
        .layer(middleware::from_fn_with_state(state, page_gate))
        .layer(CookieManagerLayer::new())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        auth::verify,
        auth::refresh,
        auth::change_password,
        requests::submit_request,
        requests::list_own_requests,
        company::setup_company,
        company::company_info,
        company::list_requests,
        company::update_status,
        company::fetch_payload,
        admin::provision_user,
        admin::list_users,
        admin::audit_events,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            RegisterBody,
            LoginBody,
            ChangePasswordBody,
            SubmitRequestBody,
            UpdateStatusBody,
            CompanySetupBody,
            ProvisionUserBody,
            UserInfo,
            RequestSummary,
            SubmitReceipt,
            CompanyInfo,
            PayloadEnvelope,
            AuthenticatedUser,
            AuditEvent,
            AuditEventType,
            Role,
            RequestType,
            RequestStatus,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and session tokens"),
        (name = "Requests", description = "LGPD request submission"),
        (name = "Company", description = "Company setup and request triage"),
        (name = "Admin", description = "Super-admin provisioning and audit"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;
