use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use super::ALREADY_CONFIRMED;
use crate::identity::models::EmailAddress;
use crate::identity::models::VerificationRequest;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn verify_email<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let email = EmailAddress::new(body.email)?;

    let message = match state
        .auth_service
        .request_verification_email(email.as_str(), &state.public_url)
        .await?
    {
        VerificationRequest::Sent => "Check your email for confirmation.",
        VerificationRequest::AlreadyConfirmed => ALREADY_CONFIRMED,
    };

    Ok(ApiSuccess::new(StatusCode::OK, MessageData::new(message)))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyEmailRequest {
    email: String,
}
