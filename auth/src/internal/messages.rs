use serde::Deserialize;
use serde::Serialize;

/// Header carrying the shared internal secret.
pub const INTERNAL_TOKEN_HEADER: &str = "x-internal-token";

/// Route of the verification endpoint on the auth service.
pub const VERIFY_USER_PATH: &str = "/internal/verify-user";

/// Reserved password value that skips secret verification.
///
/// Used by a console that already holds an authenticated session and only
/// needs to re-check that the account still exists and is an admin.
pub const SESSION_SENTINEL: &str = "__session__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyUserRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyUserResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl VerifyUserResponse {
    pub fn denied() -> Self {
        Self {
            success: false,
            email: None,
            role: None,
        }
    }

    pub fn granted(email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            success: true,
            email: Some(email.into()),
            role: Some(role.into()),
        }
    }
}
