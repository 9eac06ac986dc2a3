use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Request extension set by [`authenticate`] and [`require_admin`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub access_token: String,
}

/// Resolve the bearer token into the current user.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let access_token = bearer_token(&req)?.to_string();

    let user = state
        .auth_service
        .current_user(&access_token)
        .await
        .map_err(ApiError::from)?;

    req.extensions_mut().insert(CurrentUser { user, access_token });
    Ok(next.run(req).await)
}

/// Like [`authenticate`], additionally rejecting non-admins with 403.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let access_token = bearer_token(&req)?.to_string();

    let user = state
        .auth_service
        .require_admin(&access_token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Admin gate rejected request");
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(CurrentUser { user, access_token });
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Result<&str, ApiError> {
    let unauthorized = || ApiError::Unauthorized("Could not validate credentials".to_string());

    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(unauthorized)?
        .to_str()
        .map_err(|_| unauthorized())?;

    let (scheme, token) = value.split_once(' ').ok_or_else(unauthorized)?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(unauthorized());
    }

    Ok(token.trim())
}
