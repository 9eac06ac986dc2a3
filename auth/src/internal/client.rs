use std::time::Duration;

use reqwest::StatusCode;

use super::errors::VerificationError;
use super::messages::VerifyUserRequest;
use super::messages::VerifyUserResponse;
use super::messages::INTERNAL_TOKEN_HEADER;
use super::messages::VERIFY_USER_PATH;

/// HTTP client for the auth service's internal verification endpoint.
pub struct VerificationClient {
    client: reqwest::Client,
    base_url: String,
    internal_token: String,
}

impl VerificationClient {
    /// Create a client for the auth service at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Auth service origin, e.g. `http://auth:8080`
    /// * `internal_token` - Shared internal secret
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    /// * `UpstreamFailure` - The HTTP client could not be built
    pub fn new(
        base_url: impl Into<String>,
        internal_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VerificationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VerificationError::UpstreamFailure(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            internal_token: internal_token.into(),
        })
    }

    /// Ask the auth service whether `email`/`password` belong to an admin.
    ///
    /// Pass [`super::SESSION_SENTINEL`] as `password` to re-validate an
    /// existing console session without a secret.
    ///
    /// # Returns
    /// The service's verdict; `success == false` for unknown users, wrong
    /// secrets and non-admins alike
    ///
    /// # Errors
    /// * `Forbidden` - The internal token was rejected
    /// * `UpstreamFailure` - Transport error, timeout, unexpected status or body
    pub async fn verify_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<VerifyUserResponse, VerificationError> {
        let url = format!("{}{}", self.base_url, VERIFY_USER_PATH);

        let response = self
            .client
            .post(&url)
            .header(INTERNAL_TOKEN_HEADER, &self.internal_token)
            .json(&VerifyUserRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, url = %url, "Internal verification request failed");
                VerificationError::UpstreamFailure(e.to_string())
            })?;

        match response.status() {
            StatusCode::FORBIDDEN => Err(VerificationError::Forbidden),
            status if !status.is_success() => Err(VerificationError::UpstreamFailure(format!(
                "unexpected status {}",
                status
            ))),
            _ => response
                .json::<VerifyUserResponse>()
                .await
                .map_err(|e| VerificationError::UpstreamFailure(e.to_string())),
        }
    }
}
