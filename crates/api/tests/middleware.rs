//! Tests for the authenticate middleware and role gates on a guarded route.
//!
//! A counting handler records how often it actually runs, so rejections can
//! be shown to short-circuit before any handler code.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use common::{body_json, get as get_req, get_auth, get_with_header, TestContext};
use edunexus_api::auth::jwt::{Claims, TokenKind};
use edunexus_api::middleware::auth::AuthUser;
use edunexus_api::middleware::rbac::RoleGate;
use edunexus_api::routes::guarded;
use edunexus_core::identity::Identity;
use edunexus_core::roles::Role;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `/api/reports` behind authentication and a gate allowing `roles`.
fn gated_app(ctx: &TestContext, roles: &[Role], hits: Arc<AtomicUsize>) -> Router {
    let handler = move |user: AuthUser| {
        let hits = Arc::clone(&hits);
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            Json(json!({ "userId": user.user_id, "role": user.role }))
        }
    };

    let reports = guarded(
        Router::new().route("/reports", get(handler)),
        &ctx.state,
        RoleGate::new(roles.iter().copied()),
    );

    Router::new()
        .nest("/api", reports)
        .with_state(ctx.state.clone())
}

fn access_token(ctx: &TestContext, role: Role) -> String {
    let identity = Identity {
        user_id: 9,
        email: "someone@edunexus.com".to_string(),
        role,
    };
    ctx.auth().tokens().issue_access_token(&identity).unwrap()
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_header_is_rejected_before_handler() {
    let ctx = TestContext::new();
    let hits = Arc::new(AtomicUsize::new(0));

    let response = get_req(gated_app(&ctx, &[Role::Admin], hits.clone()), "/api/reports").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_bearer_header_is_rejected() {
    let ctx = TestContext::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let token = access_token(&ctx, Role::Admin);

    let response = get_with_header(
        gated_app(&ctx, &[Role::Admin], hits.clone()),
        "/api/reports",
        &format!("Token {token}"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let ctx = TestContext::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let token = access_token(&ctx, Role::Admin);

    // Swap the payload for one claiming a different user.
    let other = access_token(&ctx, Role::Student);
    let mut parts: Vec<&str> = token.split('.').collect();
    parts[1] = other.split('.').nth(1).unwrap();
    let forged = parts.join(".");

    let response = get_auth(
        gated_app(&ctx, &[Role::Admin], hits.clone()),
        "/api/reports",
        &forged,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid token");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let ctx = TestContext::new();
    let hits = Arc::new(AtomicUsize::new(0));

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: 9,
        email: "someone@edunexus.com".to_string(),
        role: Role::Admin,
        kind: TokenKind::Access,
        exp: now - 300,
        iat: now - 1200,
        jti: "expired".to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::test_jwt_config().access_secret.as_bytes()),
    )
    .unwrap();

    let response = get_auth(
        gated_app(&ctx, &[Role::Admin], hits.clone()),
        "/api/reports",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_token_reaches_handler_exactly_once() {
    let ctx = TestContext::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let token = access_token(&ctx, Role::Admin);

    let response = get_auth(
        gated_app(&ctx, &[Role::Admin], hits.clone()),
        "/api/reports",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    let json = body_json(response).await;
    assert_eq!(json["userId"], 9);
    assert_eq!(json["role"], "ADMIN");
}

// ---------------------------------------------------------------------------
// Role gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn teacher_is_forbidden_on_admin_route() {
    let ctx = TestContext::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let token = access_token(&ctx, Role::Teacher);

    let response = get_auth(
        gated_app(&ctx, &[Role::Admin], hits.clone()),
        "/api/reports",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn multi_role_gate_admits_each_listed_role() {
    let ctx = TestContext::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let roles = [Role::Admin, Role::Teacher];

    for role in roles {
        let token = access_token(&ctx, role);
        let response = get_auth(gated_app(&ctx, &roles, hits.clone()), "/api/reports", &token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let token = access_token(&ctx, Role::Student);
    let response = get_auth(gated_app(&ctx, &roles, hits.clone()), "/api/reports", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}
