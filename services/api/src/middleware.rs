//! Admin authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use catalog::AdminSession;
use tracing::{error, warn};

use crate::{error::ApiError, state::AppState};

/// Resolve the bearer token into an [`AdminSession`]
///
/// The token must verify against the shared secret and its session record
/// must still be in Redis. A revoked session also loses its order manager.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = state.token_signer.verify(bearer.token()).map_err(|e| {
        warn!("Rejected admin token: {}", e);
        ApiError::Unauthorized
    })?;

    let record = state
        .session_store
        .find(claims.sid)
        .await
        .map_err(|e| {
            error!("Failed to look up admin session: {}", e);
            ApiError::ServiceUnavailable("Session store unavailable".to_string())
        })?;

    let Some(record) = record.filter(|r| r.admin_id == claims.sub) else {
        if state.managers.remove(claims.sid).await {
            warn!("Session {} is gone; dropped its order manager", claims.sid);
        }
        return Err(ApiError::Unauthorized);
    };

    let session = AdminSession::new(record.session_id, record.admin_id, record.expires_at);
    req.extensions_mut().insert(session);

    Ok(next.run(req).await)
}
