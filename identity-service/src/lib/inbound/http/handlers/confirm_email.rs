use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use super::ALREADY_CONFIRMED;
use crate::identity::models::Confirmation;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn confirm_email<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let message = match state.auth_service.confirm_email(&token).await? {
        Confirmation::Confirmed => "Email confirmed.",
        Confirmation::AlreadyConfirmed => ALREADY_CONFIRMED,
    };

    Ok(ApiSuccess::new(StatusCode::OK, MessageData::new(message)))
}
