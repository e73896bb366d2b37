use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::TokenData;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::router::AppState;

/// Exchange the refresh token in the `Authorization` header for an access token.
pub async fn refresh<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    let token = bearer_token(&headers)?;
    let tokens = state.auth_service.refresh(token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenData {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "bearer".to_string(),
        },
    ))
}
