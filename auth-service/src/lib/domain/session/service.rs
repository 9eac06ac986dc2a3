use std::sync::Arc;

use async_trait::async_trait;
use auth::internal::SESSION_SENTINEL;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::DecodedToken;
use auth::TokenKind;
use auth::TokenPair;
use chrono::Utc;
use constant_time_eq::constant_time_eq;

use crate::domain::blacklist::ports::BlacklistRepository;
use crate::domain::blacklist::service::TokenBlacklist;
use crate::domain::session::errors::AuthError;
use crate::domain::session::models::AdminVerdict;
use crate::domain::session::otp::OtpIssuer;
use crate::domain::session::ports::AuthServicePort;
use crate::domain::session::ports::OtpNotifier;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::Address;
use crate::domain::user::models::Identifier;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::lookup_identifier;

/// Domain service implementation for authentication flows.
///
/// Tokens carry the user's email as subject. Every token presented to this
/// service is checked for signature, expiry and revocation before use.
pub struct AuthService<UR, BR, ON>
where
    UR: UserRepository,
    BR: BlacklistRepository,
    ON: OtpNotifier,
{
    users: Arc<UR>,
    blacklist: TokenBlacklist<BR>,
    otp: OtpIssuer<UR, ON>,
    authenticator: Arc<Authenticator>,
    internal_token: String,
}

impl<UR, BR, ON> AuthService<UR, BR, ON>
where
    UR: UserRepository,
    BR: BlacklistRepository,
    ON: OtpNotifier,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `blacklist` - Revoked token store
    /// * `otp` - One-time code issuer over the same user store
    /// * `authenticator` - Token and secret handling
    /// * `internal_token` - Shared secret expected from internal callers
    pub fn new(
        users: Arc<UR>,
        blacklist: TokenBlacklist<BR>,
        otp: OtpIssuer<UR, ON>,
        authenticator: Arc<Authenticator>,
        internal_token: impl Into<String>,
    ) -> Self {
        Self {
            users,
            blacklist,
            otp,
            authenticator,
            internal_token: internal_token.into(),
        }
    }

    /// Verify a token of `kind` and make sure it has not been revoked.
    ///
    /// Every failure collapses into the same `Unauthorized`. A blacklist
    /// lookup failure rejects the token.
    async fn validate(&self, token: &str, kind: TokenKind) -> Result<DecodedToken, AuthError> {
        let decoded = self
            .authenticator
            .validate_token(token, kind, Utc::now())
            .map_err(|e| {
                tracing::debug!(kind = %kind, error = %e, "Token rejected");
                AuthError::invalid_token()
            })?;

        match self.blacklist.is_revoked(&decoded.jti).await {
            Ok(false) => Ok(decoded),
            Ok(true) => {
                tracing::debug!(kind = %kind, jti = %decoded.jti, "Revoked token presented");
                Err(AuthError::invalid_token())
            }
            Err(e) => {
                tracing::error!(error = %e, "Blacklist lookup failed, rejecting token");
                Err(AuthError::invalid_token())
            }
        }
    }

    /// Subjects are looked up as email first, then as phone number.
    async fn resolve_subject(&self, subject: &str) -> Result<User, AuthError> {
        if let Some(user) = self.users.find_by_email(subject).await? {
            return Ok(user);
        }

        self.users
            .find_by_phone(subject)
            .await?
            .ok_or_else(AuthError::invalid_token)
    }
}

#[async_trait]
impl<UR, BR, ON> AuthServicePort for AuthService<UR, BR, ON>
where
    UR: UserRepository,
    BR: BlacklistRepository,
    ON: OtpNotifier,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, AuthError> {
        // Fast path only; the unique constraints decide under concurrency.
        if self
            .users
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()).into());
        }
        if self
            .users
            .find_by_phone(command.phone.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::PhoneAlreadyExists(command.phone.to_string()).into());
        }

        let pending = self.otp.generate()?;

        let user = User {
            id: UserId::new(),
            phone: command.phone,
            email: command.email,
            name: command.name,
            role: command.role,
            credential: pending.credential.clone(),
            credential_version: 1,
            addresses: command
                .address
                .map(|draft| vec![Address::from_draft(draft)])
                .unwrap_or_default(),
            addresses_version: 1,
            created_at: Utc::now(),
        };

        let created = self.users.create(user).await?;
        tracing::info!(user_id = %created.id, role = %created.role, "User registered");

        // The account exists either way; login issues a fresh code.
        if let Err(e) = self
            .otp
            .dispatch(&created, created.credential_version, pending)
            .await
        {
            tracing::warn!(user_id = %created.id, error = %e, "Registration code not delivered");
        }

        Ok(created)
    }

    async fn request_otp(&self, identifier: &Identifier) -> Result<(), AuthError> {
        let user = lookup_identifier(self.users.as_ref(), identifier)
            .await?
            .ok_or_else(|| UserError::NotFoundByIdentifier(identifier.to_string()))?;

        self.otp.issue(&user).await?;
        Ok(())
    }

    async fn verify_otp(
        &self,
        identifier: &Identifier,
        code: &str,
    ) -> Result<TokenPair, AuthError> {
        let Some(user) = lookup_identifier(self.users.as_ref(), identifier).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !self.otp.verify(&user, code).await? {
            tracing::debug!(user_id = %user.id, "One-time code rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.authenticator.issue_token_pair(user.email.as_str())?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(tokens)
    }

    async fn current_user(&self, access_token: &str) -> Result<User, AuthError> {
        let decoded = self.validate(access_token, TokenKind::Access).await?;
        self.resolve_subject(&decoded.subject).await
    }

    async fn require_admin(&self, access_token: &str) -> Result<User, AuthError> {
        let user = self.current_user(access_token).await?;

        if !user.role.is_admin() {
            tracing::debug!(user_id = %user.id, role = %user.role, "Admin access denied");
            return Err(AuthError::Forbidden("Admin privileges required".to_string()));
        }

        Ok(user)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let decoded = self.validate(refresh_token, TokenKind::Refresh).await?;
        let user = self.resolve_subject(&decoded.subject).await?;

        // Rotate: the presented refresh token is single use. Only the caller
        // whose revocation lands first gets a new pair.
        if !self
            .blacklist
            .revoke(&decoded.jti, decoded.expires_at)
            .await?
        {
            tracing::warn!(user_id = %user.id, jti = %decoded.jti, "Refresh token replayed");
            return Err(AuthError::invalid_token());
        }

        let tokens = self.authenticator.issue_token_pair(user.email.as_str())?;
        tracing::debug!(user_id = %user.id, "Tokens refreshed");

        Ok(tokens)
    }

    async fn logout(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), AuthError> {
        let access = self.validate(access_token, TokenKind::Access).await?;
        self.blacklist.revoke(&access.jti, access.expires_at).await?;

        if let Some(token) = refresh_token {
            match self
                .authenticator
                .validate_token(token, TokenKind::Refresh, Utc::now())
            {
                Ok(refresh) => {
                    self.blacklist
                        .revoke(&refresh.jti, refresh.expires_at)
                        .await?;
                }
                Err(e) => tracing::debug!(error = %e, "Refresh token not revoked on logout"),
            }
        }

        tracing::info!(subject = %access.subject, "User logged out");
        Ok(())
    }

    async fn verify_internal(
        &self,
        internal_token: &str,
        email: &str,
        password: &str,
    ) -> Result<AdminVerdict, AuthError> {
        if self.internal_token.is_empty()
            || !constant_time_eq(internal_token.as_bytes(), self.internal_token.as_bytes())
        {
            tracing::warn!("Internal verification with invalid token");
            return Err(AuthError::Forbidden("Invalid internal token".to_string()));
        }

        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(AdminVerdict::Denied);
        };

        if password != SESSION_SENTINEL {
            if let Some(expires_at) = user.credential.otp_expires_at() {
                if Utc::now() > expires_at {
                    return Ok(AdminVerdict::Denied);
                }
            }

            match self
                .authenticator
                .verify_secret(password, user.credential.hash())
            {
                Ok(()) => {}
                Err(AuthenticationError::InvalidCredentials) => return Ok(AdminVerdict::Denied),
                Err(e) => {
                    tracing::warn!(user_id = %user.id, error = %e, "Stored secret unverifiable");
                    return Ok(AdminVerdict::Denied);
                }
            }
        }

        if !user.role.is_admin() {
            return Ok(AdminVerdict::Denied);
        }

        Ok(AdminVerdict::Granted {
            email: user.email,
            role: user.role,
        })
    }
}
