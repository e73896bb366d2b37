use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::identity::errors::EmailError;
use crate::identity::models::EmailAddress;
use crate::identity::models::SignupCommand;
use crate::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn signup<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<SignupRequest>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    state
        .auth_service
        .signup(body.try_into_command()?, &state.public_url)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::CREATED, identity.into()))
}

/// HTTP request body for creating an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    email: String,
    password: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: Option<String>,
}

impl SignupRequest {
    fn try_into_command(self) -> Result<SignupCommand, ApiError> {
        let email = EmailAddress::new(self.email)?;
        if self.password.is_empty() {
            return Err(ApiError::UnprocessableEntity(
                "Password must not be empty".to_string(),
            ));
        }
        Ok(SignupCommand::new(
            email,
            self.password,
            self.first_name,
            self.last_name,
        ))
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        ApiError::UnprocessableEntity(format!("Invalid email: {}", err))
    }
}
