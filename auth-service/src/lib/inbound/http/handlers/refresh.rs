use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;

use super::verify_otp::issue_session;
use super::verify_otp::TokenData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Rotate the refresh cookie into a fresh token pair.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<TokenData>), ApiError> {
    let refresh_token = state
        .refresh_cookie
        .read(&jar)
        .ok_or_else(|| ApiError::Unauthorized("Refresh token missing".to_string()))?;

    let pair = state
        .auth_service
        .refresh(&refresh_token)
        .await
        .map_err(ApiError::from)?;

    Ok(issue_session(&state, jar, pair))
}
