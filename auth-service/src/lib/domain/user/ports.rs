use async_trait::async_trait;

use crate::domain::user::models::Address;
use crate::domain::user::models::AddressDraft;
use crate::domain::user::models::AddressId;
use crate::domain::user::models::Credential;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// List the user's addresses in insertion order.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn list_addresses(&self, id: &UserId) -> Result<Vec<Address>, UserError>;

    /// Append an address under a freshly generated id.
    ///
    /// # Returns
    /// The full address list after the change
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `ConcurrentModification` - The list kept changing underneath
    /// * `DatabaseError` - Database operation failed
    async fn add_address(&self, id: &UserId, draft: AddressDraft)
        -> Result<Vec<Address>, UserError>;

    /// Replace the fields of an existing address, keeping its id.
    ///
    /// # Returns
    /// The full address list after the change
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `AddressNotFound` - No address with this id
    /// * `ConcurrentModification` - The list kept changing underneath
    /// * `DatabaseError` - Database operation failed
    async fn update_address(
        &self,
        id: &UserId,
        address_id: &AddressId,
        draft: AddressDraft,
    ) -> Result<Vec<Address>, UserError>;

    /// Remove an address.
    ///
    /// # Returns
    /// The remaining address list
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `AddressNotFound` - No address with this id
    /// * `ConcurrentModification` - The list kept changing underneath
    /// * `DatabaseError` - Database operation failed
    async fn delete_address(
        &self,
        id: &UserId,
        address_id: &AddressId,
    ) -> Result<Vec<Address>, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PhoneAlreadyExists` - Phone number is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by phone number as stored.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, UserError>;

    /// Overwrite the credential unconditionally and bump its version.
    ///
    /// # Returns
    /// The new credential version
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn store_credential(&self, id: &UserId, credential: &Credential)
        -> Result<i64, UserError>;

    /// Overwrite the credential only if its version is still `expected_version`.
    ///
    /// # Returns
    /// `true` if the swap happened, `false` if the version moved on or the
    /// user no longer exists
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn swap_credential(
        &self,
        id: &UserId,
        expected_version: i64,
        credential: &Credential,
    ) -> Result<bool, UserError>;

    /// Replace the address list only if its version is still `expected_version`.
    ///
    /// # Returns
    /// `true` if the swap happened, `false` if the version moved on or the
    /// user no longer exists
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn swap_addresses(
        &self,
        id: &UserId,
        expected_version: i64,
        addresses: &[Address],
    ) -> Result<bool, UserError>;
}
