use async_trait::async_trait;
use auth::OneTimeCode;

use crate::domain::session::errors::NotifierError;
use crate::domain::session::ports::OtpNotifier;
use crate::domain::user::models::User;

/// Notifier that only records the issue of a code in the service log.
///
/// The plaintext code is logged only when `reveal_codes` is set, which is
/// meant for local development without a delivery channel.
pub struct TracingOtpNotifier {
    reveal_codes: bool,
}

impl TracingOtpNotifier {
    pub fn new(reveal_codes: bool) -> Self {
        Self { reveal_codes }
    }
}

/// `a@x.com` becomes `a***@x.com`.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().unwrap_or('*');
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl OtpNotifier for TracingOtpNotifier {
    async fn deliver(&self, user: &User, code: &OneTimeCode) -> Result<(), NotifierError> {
        if self.reveal_codes {
            tracing::debug!(
                user_id = %user.id,
                email = %user.email,
                code = %code.as_str(),
                "One-time code (development delivery)"
            );
        } else {
            tracing::info!(
                user_id = %user.id,
                email = %mask_email(user.email.as_str()),
                "One-time code ready for delivery"
            );
        }
        Ok(())
    }
}
