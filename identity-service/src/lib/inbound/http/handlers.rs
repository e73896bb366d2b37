use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::identity::errors::AuthError;
use crate::identity::models::Identity;

pub mod confirm_email;
pub mod login;
pub mod me;
pub mod refresh;
pub mod signup;
pub mod verify_email;

pub const INCORRECT_CREDENTIALS: &str = "Incorrect username or password.";
pub const EMAIL_NOT_CONFIRMED: &str = "Email not confirmed.";
pub const INVALID_CREDENTIALS: &str = "Could not validate credentials.";
pub const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token.";
pub const UNKNOWN_IDENTITY: &str = "Could not validate user.";
pub const ALREADY_CONFIRMED: &str = "Your email is already confirmed.";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    Conflict(String),
    Unauthorized(String),
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let mut response =
            (status, Json(ApiResponseBody::new_error(status, message))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

/// Client-facing rendering of the auth taxonomy.
///
/// Token failures collapse into one message so a caller cannot probe which
/// check rejected it. Infrastructure detail stays in the logs.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized(INCORRECT_CREDENTIALS.to_string())
            }
            AuthError::EmailNotConfirmed => ApiError::Unauthorized(EMAIL_NOT_CONFIRMED.to_string()),
            AuthError::InvalidToken | AuthError::ExpiredToken | AuthError::WrongTokenClass => {
                ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
            }
            AuthError::RevokedToken => ApiError::Unauthorized(INVALID_REFRESH_TOKEN.to_string()),
            AuthError::NotFound(_) => ApiError::Unauthorized(UNKNOWN_IDENTITY.to_string()),
            AuthError::AlreadyExists(_) => ApiError::Conflict("Account already exists.".to_string()),
            AuthError::InvalidEmail(_) => ApiError::UnprocessableEntity(err.to_string()),
            AuthError::StoreUnavailable(_)
            | AuthError::CacheUnavailable(_)
            | AuthError::Timeout(_) => {
                tracing::error!(error = %err, "Dependency unavailable");
                ApiError::ServiceUnavailable("Service temporarily unavailable.".to_string())
            }
            AuthError::Internal(_) => {
                tracing::error!(error = %err, "Internal error");
                ApiError::InternalServerError("Internal server error.".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Public view of an identity. Never carries the digest or refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityData {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Identity> for IdentityData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            email: identity.email.as_str().to_string(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            confirmed: identity.confirmed,
            created_at: identity.created_at,
        }
    }
}

/// Token response shared by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
}
