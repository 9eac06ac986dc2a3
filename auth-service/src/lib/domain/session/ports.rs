use async_trait::async_trait;
use auth::OneTimeCode;
use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;
use futures::future::BoxFuture;

use crate::domain::session::errors::AuthError;
use crate::domain::session::errors::NotifierError;
use crate::domain::session::models::AdminVerdict;
use crate::domain::user::models::Identifier;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for authentication flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a user whose initial credential is a fresh one-time code.
    ///
    /// A failed code delivery is logged and does not fail the registration.
    ///
    /// # Errors
    /// * `User(EmailAlreadyExists | PhoneAlreadyExists)` - Identity taken
    async fn register(&self, command: RegisterUserCommand) -> Result<User, AuthError>;

    /// Replace the user's credential with a fresh one-time code.
    ///
    /// # Errors
    /// * `User(NotFoundByIdentifier)` - No user with this email or phone
    /// * `Delivery` - The code could not be handed to the notifier
    async fn request_otp(&self, identifier: &Identifier) -> Result<(), AuthError>;

    /// Exchange a pending one-time code for an access and a refresh token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user, wrong, expired or consumed code
    async fn verify_otp(&self, identifier: &Identifier, code: &str)
        -> Result<TokenPair, AuthError>;

    /// Resolve the user behind an access token.
    ///
    /// # Errors
    /// * `Unauthorized` - Token invalid, expired, revoked, or user gone
    async fn current_user(&self, access_token: &str) -> Result<User, AuthError>;

    /// Resolve the user behind an access token and require the admin role.
    ///
    /// # Errors
    /// * `Unauthorized` - As for `current_user`
    /// * `Forbidden` - User is not an admin
    async fn require_admin(&self, access_token: &str) -> Result<User, AuthError>;

    /// Rotate a refresh token into a new token pair.
    ///
    /// # Errors
    /// * `Unauthorized` - Token invalid, expired, revoked, or user gone
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Revoke the access token and, when given and decodable, the refresh token.
    ///
    /// # Errors
    /// * `Unauthorized` - Access token is not valid
    async fn logout(&self, access_token: &str, refresh_token: Option<&str>)
        -> Result<(), AuthError>;

    /// Check admin credentials on behalf of another service.
    ///
    /// # Errors
    /// * `Forbidden` - `internal_token` does not match the shared secret
    async fn verify_internal(
        &self,
        internal_token: &str,
        email: &str,
        password: &str,
    ) -> Result<AdminVerdict, AuthError>;
}

/// Out-of-band delivery of one-time codes.
#[async_trait]
pub trait OtpNotifier: Send + Sync + 'static {
    /// # Errors
    /// * `DeliveryFailed` - The code could not be delivered
    async fn deliver(&self, user: &User, code: &OneTimeCode) -> Result<(), NotifierError>;
}

/// Deferred job run by a [`SweepScheduler`].
pub type SweepJob = BoxFuture<'static, ()>;

/// Runs at most one deferred sweep per user.
pub trait SweepScheduler: Send + Sync + 'static {
    /// Run `job` at `run_at`, replacing any job pending for `user_id`.
    fn schedule(&self, user_id: UserId, run_at: DateTime<Utc>, job: SweepJob);

    /// Drop the job pending for `user_id`, if any.
    fn cancel(&self, user_id: &UserId);
}
