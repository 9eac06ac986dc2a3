use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum_extra::extract::cookie::CookieJar;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<MessageData>), ApiError> {
    let refresh_token = state.refresh_cookie.read(&jar);

    state
        .auth_service
        .logout(&current.access_token, refresh_token.as_deref())
        .await
        .map_err(ApiError::from)?;

    tracing::info!(user_id = %current.user.id, "User logged out");

    Ok((
        jar.remove(state.refresh_cookie.clear()),
        ApiSuccess::new(StatusCode::OK, MessageData::new("Successfully logged out")),
    ))
}
