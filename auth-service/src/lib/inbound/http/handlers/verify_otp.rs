use auth::TokenPair;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Identifier;
use crate::inbound::http::router::AppState;

pub async fn verify_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<(CookieJar, ApiSuccess<TokenData>), ApiError> {
    let identifier = Identifier::parse(&body.identifier);

    let pair = state
        .auth_service
        .verify_otp(&identifier, &body.otp)
        .await
        .map_err(ApiError::from)?;

    Ok(issue_session(&state, jar, pair))
}

/// Access token into the body, refresh token into the cookie.
pub(super) fn issue_session(
    state: &AppState,
    jar: CookieJar,
    pair: TokenPair,
) -> (CookieJar, ApiSuccess<TokenData>) {
    let jar = jar.add(state.refresh_cookie.issue(pair.refresh.token));
    (
        jar,
        ApiSuccess::new(StatusCode::OK, TokenData::bearer(pair.access.token)),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyOtpRequest {
    identifier: String,
    otp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub access_token: String,
    pub token_type: String,
}

impl TokenData {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
