use async_trait::async_trait;
use auth::OneTimeCode;
use chrono::DateTime;
use chrono::Utc;
use mockall::mock;

use crate::domain::blacklist::errors::BlacklistError;
use crate::domain::blacklist::models::RevokedToken;
use crate::domain::blacklist::ports::BlacklistRepository;
use crate::domain::session::errors::NotifierError;
use crate::domain::session::ports::OtpNotifier;
use crate::domain::session::ports::SweepJob;
use crate::domain::session::ports::SweepScheduler;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::Address;
use crate::domain::user::models::Credential;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

mock! {
    pub TestUserRepository {}

    #[async_trait]
    impl UserRepository for TestUserRepository {
        async fn create(&self, user: User) -> Result<User, UserError>;
        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
        async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, UserError>;
        async fn store_credential(&self, id: &UserId, credential: &Credential) -> Result<i64, UserError>;
        async fn swap_credential(&self, id: &UserId, expected_version: i64, credential: &Credential) -> Result<bool, UserError>;
        async fn swap_addresses(&self, id: &UserId, expected_version: i64, addresses: &[Address]) -> Result<bool, UserError>;
    }
}

mock! {
    pub TestBlacklistRepository {}

    #[async_trait]
    impl BlacklistRepository for TestBlacklistRepository {
        async fn insert(&self, token: &RevokedToken) -> Result<bool, BlacklistError>;
        async fn find(&self, jti: &str) -> Result<Option<RevokedToken>, BlacklistError>;
        async fn delete(&self, jti: &str) -> Result<(), BlacklistError>;
        async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, BlacklistError>;
    }
}

mock! {
    pub TestOtpNotifier {}

    #[async_trait]
    impl OtpNotifier for TestOtpNotifier {
        async fn deliver(&self, user: &User, code: &OneTimeCode) -> Result<(), NotifierError>;
    }
}

mock! {
    pub TestSweepScheduler {}

    impl SweepScheduler for TestSweepScheduler {
        fn schedule(&self, user_id: UserId, run_at: DateTime<Utc>, job: SweepJob);
        fn cancel(&self, user_id: &UserId);
    }
}

