use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use super::IdentityData;
use crate::inbound::http::middleware::AuthenticatedIdentity;

pub async fn me(
    Extension(AuthenticatedIdentity(identity)): Extension<AuthenticatedIdentity>,
) -> ApiSuccess<IdentityData> {
    ApiSuccess::new(StatusCode::OK, (&identity).into())
}
