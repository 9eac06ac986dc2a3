use auth::internal::messages::VerifyUserRequest;
use auth::internal::messages::VerifyUserResponse;
use auth::internal::messages::INTERNAL_TOKEN_HEADER;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use super::ApiError;
use crate::domain::session::models::AdminVerdict;
use crate::inbound::http::router::AppState;

/// Admin credential check for other services.
///
/// Answers with the bare `{success, email?, role?}` body the verification
/// client decodes, not the usual envelope.
pub async fn verify_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<VerifyUserRequest>,
) -> Result<Json<VerifyUserResponse>, ApiError> {
    let internal_token = headers
        .get(INTERNAL_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let verdict = state
        .auth_service
        .verify_internal(internal_token, &body.email, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(match verdict {
        AdminVerdict::Granted { email, role } => {
            VerifyUserResponse::granted(email.as_str(), role.as_str())
        }
        AdminVerdict::Denied => VerifyUserResponse::denied(),
    }))
}
