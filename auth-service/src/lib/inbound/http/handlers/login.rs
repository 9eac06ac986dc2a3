use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Identifier;
use crate::inbound::http::router::AppState;

/// Request a one-time code for the user behind `?identifier=`.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let identifier = Identifier::parse(&query.identifier);

    state
        .auth_service
        .request_otp(&identifier)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, LoginResponseData::otp_sent()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginQuery {
    identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub message: String,
    #[serde(rename = "_links")]
    pub links: LoginLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginLinks {
    pub verify_otp: Link,
    pub resend_otp: Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    fn new(href: &str) -> Self {
        Self {
            href: href.to_string(),
        }
    }
}

impl LoginResponseData {
    fn otp_sent() -> Self {
        Self {
            message: "OTP sent to your registered email/phone".to_string(),
            links: LoginLinks {
                verify_otp: Link::new("/api/v1/auth/verify-otp"),
                resend_otp: Link::new("/api/v1/auth/login"),
            },
        }
    }
}
