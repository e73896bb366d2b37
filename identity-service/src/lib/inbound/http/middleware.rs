use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use super::handlers::INVALID_CREDENTIALS;
use crate::identity::models::Identity;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Identity resolved from a valid access token, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity(pub Identity);

/// Middleware that admits only requests carrying a valid access token.
pub async fn require_access_token<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Request is not Sync; no borrow of it may be held across an await
    let token = bearer_token(req.headers())?.to_string();

    let identity = state
        .auth_service
        .authenticate_access(&token)
        .await
        .map_err(ApiError::from)?;

    req.extensions_mut().insert(AuthenticatedIdentity(identity));

    Ok(next.run(req).await)
}

/// Extract the credentials of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let unauthorized = || ApiError::Unauthorized(INVALID_CREDENTIALS.to_string());

    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(unauthorized)?
        .to_str()
        .map_err(|_| unauthorized())?;

    let (scheme, token) = value.split_once(' ').ok_or_else(unauthorized)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(unauthorized());
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(unauthorized());
    }

    Ok(token)
}
