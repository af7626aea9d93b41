//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{DateTime, Utc};
use common::session::SessionRecord;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{AppState, error::AuthError, password::verify_password};

/// Request for admin login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Response for token generation
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub expires_at: DateTime<Utc>,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// Admin login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    if payload.password.is_empty() {
        return Err(AuthError::BadRequest("Password is required".to_string()));
    }

    info!("Admin login attempt");

    let credentials = state.admin_repository.all_credentials().await.map_err(|e| {
        error!("Failed to load admin credentials: {}", e);
        AuthError::InternalServerError
    })?;

    // Argon2 verification is CPU bound.
    let password = payload.password;
    let matched = tokio::task::spawn_blocking(move || {
        credentials
            .into_iter()
            .find(|credential| verify_password(&password, &credential.password_hash))
            .map(|credential| credential.id)
    })
    .await
    .map_err(|e| {
        error!("Password verification task failed: {}", e);
        AuthError::InternalServerError
    })?;

    let Some(admin_id) = matched else {
        warn!("Admin login rejected");
        return Err(AuthError::Unauthorized);
    };

    if let Err(e) = state.admin_repository.record_login(admin_id).await {
        warn!("Failed to record login for admin {}: {}", admin_id, e);
    }

    let now = Utc::now();
    let session_id = Uuid::new_v4();
    let (access_token, claims) = state
        .token_signer
        .issue(admin_id, session_id, now)
        .map_err(|e| {
            error!("Failed to sign admin token: {}", e);
            AuthError::InternalServerError
        })?;

    let record = SessionRecord {
        session_id,
        admin_id,
        issued_at: now,
        expires_at: claims.expires_at(),
    };
    state.session_store.create(&record).await.map_err(|e| {
        error!("Failed to store admin session: {}", e);
        AuthError::InternalServerError
    })?;

    let response = TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: record.ttl_seconds(now),
        expires_at: record.expires_at,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Logout endpoint
pub async fn logout(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<impl IntoResponse, AuthError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AuthError::Unauthorized)?;

    let claims = state
        .token_signer
        .verify(bearer.token())
        .map_err(|_| AuthError::Unauthorized)?;

    let revoked = state.session_store.revoke(claims.sid).await.map_err(|e| {
        error!("Failed to revoke admin session: {}", e);
        AuthError::InternalServerError
    })?;

    if !revoked {
        info!("Session {} was already gone at logout", claims.sid);
    }

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Logged out successfully"})),
    ))
}
