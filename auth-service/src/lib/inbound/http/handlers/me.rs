use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::addresses::AddressData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::inbound::http::middleware::CurrentUser;

pub async fn me(
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, (&current.user).into()))
}

pub async fn admin_check(
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiSuccess<AdminGreetingData>, ApiError> {
    Ok(ApiSuccess::new(
        StatusCode::OK,
        AdminGreetingData {
            msg: format!("Hello {}, you are an admin.", current.user.email),
        },
    ))
}

/// Public view of a user; never includes the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub phone_number: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub addresses: Vec<AddressData>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            phone_number: user.phone.as_str().to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.as_str().to_string(),
            role: user.role.as_str().to_string(),
            addresses: AddressData::list(&user.addresses),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminGreetingData {
    pub msg: String,
}
