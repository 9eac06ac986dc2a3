use std::sync::Arc;

use auth::OneTimeCode;
use auth::SecretHasher;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::session::errors::AuthError;
use crate::domain::session::ports::OtpNotifier;
use crate::domain::session::ports::SweepScheduler;
use crate::domain::user::models::Credential;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// A freshly drawn code together with the credential that stores it.
pub struct PendingCode {
    pub code: OneTimeCode,
    pub credential: Credential,
    pub expires_at: DateTime<Utc>,
}

/// Issues, verifies and expires one-time codes.
///
/// Every credential write bumps `credential_version`. Consuming and expiring
/// a code are compare-and-swap writes against the version that was read, so
/// a code verifies at most once and a stale sweep never clears a newer code.
pub struct OtpIssuer<UR, ON>
where
    UR: UserRepository,
    ON: OtpNotifier,
{
    repository: Arc<UR>,
    notifier: Arc<ON>,
    scheduler: Arc<dyn SweepScheduler>,
    hasher: SecretHasher,
    ttl: Duration,
}

impl<UR, ON> OtpIssuer<UR, ON>
where
    UR: UserRepository,
    ON: OtpNotifier,
{
    pub fn new(
        repository: Arc<UR>,
        notifier: Arc<ON>,
        scheduler: Arc<dyn SweepScheduler>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            notifier,
            scheduler,
            hasher: SecretHasher::new(),
            ttl,
        }
    }

    /// Draw a code and hash it, without storing anything.
    ///
    /// # Errors
    /// * `Secret` - Hashing failed
    pub fn generate(&self) -> Result<PendingCode, AuthError> {
        let code = OneTimeCode::generate();
        let expires_at = Utc::now() + self.ttl;
        let hash = self.hasher.hash(code.as_str())?;

        Ok(PendingCode {
            code,
            credential: Credential::OneTimeCode { hash, expires_at },
            expires_at,
        })
    }

    /// Replace the user's credential with a fresh code.
    ///
    /// # Returns
    /// The plaintext code, already handed to the notifier
    ///
    /// # Errors
    /// * `User(NotFound)` - User no longer exists
    /// * `Delivery` - Notifier rejected the code
    pub async fn issue(&self, user: &User) -> Result<OneTimeCode, AuthError> {
        let pending = self.generate()?;
        let version = self
            .repository
            .store_credential(&user.id, &pending.credential)
            .await?;

        self.dispatch(user, version, pending).await
    }

    /// Arm the expiry sweep for a stored code and deliver it.
    ///
    /// `version` is the credential version the code was stored under.
    pub async fn dispatch(
        &self,
        user: &User,
        version: i64,
        pending: PendingCode,
    ) -> Result<OneTimeCode, AuthError> {
        let job = sweep(
            Arc::clone(&self.repository),
            self.hasher,
            user.id,
            version,
        );
        self.scheduler
            .schedule(user.id, pending.expires_at, Box::pin(job));

        self.notifier.deliver(user, &pending.code).await?;

        tracing::info!(
            user_id = %user.id,
            expires_at = %pending.expires_at,
            "One-time code issued"
        );
        Ok(pending.code)
    }

    /// Check `candidate` against the user's pending code and consume it.
    ///
    /// `user` must be the state read just before the call; its
    /// `credential_version` guards the consuming write.
    ///
    /// # Returns
    /// `true` exactly once per issued code
    ///
    /// # Errors
    /// * `Secret` - Stored hash is malformed, or the replacement hash failed
    /// * `User(DatabaseError)` - Consuming write failed
    pub async fn verify(&self, user: &User, candidate: &str) -> Result<bool, AuthError> {
        let Credential::OneTimeCode { hash, expires_at } = &user.credential else {
            return Ok(false);
        };

        if Utc::now() > *expires_at || !OneTimeCode::is_well_formed(candidate) {
            return Ok(false);
        }

        if !self.hasher.verify(candidate, hash)? {
            return Ok(false);
        }

        let consumed = Credential::Password {
            hash: self.hasher.unusable_hash()?,
        };
        let swapped = self
            .repository
            .swap_credential(&user.id, user.credential_version, &consumed)
            .await?;

        if swapped {
            self.scheduler.cancel(&user.id);
        } else {
            tracing::warn!(user_id = %user.id, "One-time code consumed concurrently");
        }

        Ok(swapped)
    }

    /// Clear the code stored under `version` if it is still current.
    ///
    /// Never fails: a consumed or replaced code, a deleted user and a store
    /// error all end the sweep quietly.
    pub async fn expire_sweep(&self, user_id: UserId, version: i64) {
        sweep(Arc::clone(&self.repository), self.hasher, user_id, version).await
    }
}

async fn sweep<UR>(repository: Arc<UR>, hasher: SecretHasher, user_id: UserId, version: i64)
where
    UR: UserRepository,
{
    let cleared = match hasher.unusable_hash() {
        Ok(hash) => Credential::Password { hash },
        Err(e) => {
            tracing::debug!(user_id = %user_id, error = %e, "OTP sweep skipped");
            return;
        }
    };

    match repository.swap_credential(&user_id, version, &cleared).await {
        Ok(true) => tracing::debug!(user_id = %user_id, "Expired one-time code cleared"),
        Ok(false) => tracing::debug!(user_id = %user_id, "One-time code already consumed or replaced"),
        Err(e) => tracing::debug!(user_id = %user_id, error = %e, "OTP sweep failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mocks::MockTestOtpNotifier;
    use crate::domain::mocks::MockTestSweepScheduler;
    use crate::domain::mocks::MockTestUserRepository;
    use crate::domain::session::errors::NotifierError;
    use crate::domain::user::errors::UserError;
    use crate::domain::user::models::DisplayName;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::PhoneNumber;
    use crate::domain::user::models::Role;

    fn user_with(credential: Credential, credential_version: i64) -> User {
        User {
            id: UserId::new(),
            phone: PhoneNumber::new("+16502530000").unwrap(),
            email: EmailAddress::new("a@x.com".to_string()).unwrap(),
            name: DisplayName::new("A".to_string()).unwrap(),
            role: Role::User,
            credential,
            credential_version,
            addresses: vec![],
            addresses_version: 1,
            created_at: Utc::now(),
        }
    }

    fn pending_user(code: &str, expires_at: DateTime<Utc>, version: i64) -> User {
        let hash = SecretHasher::new().hash(code).unwrap();
        user_with(Credential::OneTimeCode { hash, expires_at }, version)
    }

    fn issuer(
        repository: MockTestUserRepository,
        notifier: MockTestOtpNotifier,
        scheduler: MockTestSweepScheduler,
    ) -> OtpIssuer<MockTestUserRepository, MockTestOtpNotifier> {
        OtpIssuer::new(
            Arc::new(repository),
            Arc::new(notifier),
            Arc::new(scheduler),
            Duration::minutes(5),
        )
    }

    #[tokio::test]
    async fn test_issue_stores_hash_and_schedules_sweep() {
        let user = user_with(Credential::Password { hash: "x".to_string() }, 3);
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_store_credential()
            .withf(move |id, credential| {
                *id == user_id
                    && credential.hash().starts_with("$argon2id$")
                    && credential.otp_expires_at().is_some()
            })
            .times(1)
            .returning(|_, _| Ok(4));

        let mut scheduler = MockTestSweepScheduler::new();
        scheduler
            .expect_schedule()
            .withf(move |id, run_at, _| *id == user_id && *run_at > Utc::now())
            .times(1)
            .returning(|_, _, _| ());

        let mut notifier = MockTestOtpNotifier::new();
        notifier
            .expect_deliver()
            .withf(|_, code| OneTimeCode::is_well_formed(code.as_str()))
            .times(1)
            .returning(|_, _| Ok(()));

        let code = issuer(repository, notifier, scheduler)
            .issue(&user)
            .await
            .expect("Issue should succeed");
        assert!(OneTimeCode::is_well_formed(code.as_str()));
    }

    #[tokio::test]
    async fn test_issue_surfaces_delivery_failure() {
        let user = user_with(Credential::Password { hash: "x".to_string() }, 1);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_store_credential()
            .returning(|_, _| Ok(2));

        let mut scheduler = MockTestSweepScheduler::new();
        scheduler.expect_schedule().returning(|_, _, _| ());

        let mut notifier = MockTestOtpNotifier::new();
        notifier
            .expect_deliver()
            .returning(|_, _| Err(NotifierError::DeliveryFailed("smtp down".to_string())));

        let result = issuer(repository, notifier, scheduler).issue(&user).await;
        assert!(matches!(result, Err(AuthError::Delivery(_))));
    }

    #[tokio::test]
    async fn test_verify_consumes_code_once() {
        let user = pending_user("004521", Utc::now() + Duration::minutes(5), 7);
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_swap_credential()
            .withf(move |id, version, credential| {
                *id == user_id && *version == 7 && credential.otp_expires_at().is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        let mut scheduler = MockTestSweepScheduler::new();
        scheduler
            .expect_cancel()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| ());

        let issuer = issuer(repository, MockTestOtpNotifier::new(), scheduler);
        assert!(issuer.verify(&user, "004521").await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_loses_concurrent_race() {
        let user = pending_user("004521", Utc::now() + Duration::minutes(5), 7);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_swap_credential()
            .times(1)
            .returning(|_, _, _| Ok(false));

        let mut scheduler = MockTestSweepScheduler::new();
        scheduler.expect_cancel().times(0);

        let issuer = issuer(repository, MockTestOtpNotifier::new(), scheduler);
        assert!(!issuer.verify(&user, "004521").await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_code() {
        let user = pending_user("004521", Utc::now() + Duration::minutes(5), 7);

        let mut repository = MockTestUserRepository::new();
        repository.expect_swap_credential().times(0);

        let issuer = issuer(
            repository,
            MockTestOtpNotifier::new(),
            MockTestSweepScheduler::new(),
        );
        assert!(!issuer.verify(&user, "004522").await.unwrap());
        assert!(!issuer.verify(&user, "4521").await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_expired_code() {
        let user = pending_user("004521", Utc::now() - Duration::seconds(1), 7);

        let mut repository = MockTestUserRepository::new();
        repository.expect_swap_credential().times(0);

        let issuer = issuer(
            repository,
            MockTestOtpNotifier::new(),
            MockTestSweepScheduler::new(),
        );
        assert!(!issuer.verify(&user, "004521").await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_password_credential() {
        let hash = SecretHasher::new().hash("004521").unwrap();
        let user = user_with(Credential::Password { hash }, 2);

        let mut repository = MockTestUserRepository::new();
        repository.expect_swap_credential().times(0);

        let issuer = issuer(
            repository,
            MockTestOtpNotifier::new(),
            MockTestSweepScheduler::new(),
        );
        assert!(!issuer.verify(&user, "004521").await.unwrap());
    }

    #[tokio::test]
    async fn test_expire_sweep_is_guarded_by_version() {
        let user_id = UserId::new();

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_swap_credential()
            .withf(move |id, version, credential| {
                *id == user_id && *version == 4 && credential.otp_expires_at().is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(false));

        let issuer = issuer(
            repository,
            MockTestOtpNotifier::new(),
            MockTestSweepScheduler::new(),
        );
        issuer.expire_sweep(user_id, 4).await;
    }

    #[tokio::test]
    async fn test_expire_sweep_swallows_store_errors() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_swap_credential()
            .times(1)
            .returning(|_, _, _| Err(UserError::DatabaseError("gone".to_string())));

        let issuer = issuer(
            repository,
            MockTestOtpNotifier::new(),
            MockTestSweepScheduler::new(),
        );
        issuer.expire_sweep(UserId::new(), 1).await;
    }
}
