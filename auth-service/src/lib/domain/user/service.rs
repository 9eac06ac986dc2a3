use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::models::Address;
use crate::domain::user::models::AddressDraft;
use crate::domain::user::models::AddressId;
use crate::domain::user::models::Identifier;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Attempts per address change before giving up on a contended list.
const ADDRESS_WRITE_ATTEMPTS: usize = 3;

/// Domain service implementation for user operations.
///
/// Address changes are read-modify-write cycles over the whole list. Each
/// write is a compare-and-swap on `addresses_version`; a lost race re-reads
/// and reapplies the change.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service over `repository`.
    pub fn new(repository: Arc<UR>) -> Self {
        Self { repository }
    }

    async fn load(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    /// Apply `change` to the current list and store it against the version read.
    async fn modify_addresses<F>(&self, id: &UserId, change: F) -> Result<Vec<Address>, UserError>
    where
        F: Fn(&mut Vec<Address>) -> Result<(), UserError> + Send + Sync,
    {
        for _ in 0..ADDRESS_WRITE_ATTEMPTS {
            let user = self.load(id).await?;
            let mut addresses = user.addresses;
            change(&mut addresses)?;

            if self
                .repository
                .swap_addresses(id, user.addresses_version, &addresses)
                .await?
            {
                return Ok(addresses);
            }

            tracing::debug!(user_id = %id, "Address list changed concurrently, retrying");
        }

        tracing::warn!(user_id = %id, "Address write abandoned after repeated conflicts");
        Err(UserError::ConcurrentModification(id.to_string()))
    }
}

/// Look a user up by email or phone.
///
/// Shared by every flow that starts from a login identifier.
pub async fn lookup_identifier<UR>(
    repository: &UR,
    identifier: &Identifier,
) -> Result<Option<User>, UserError>
where
    UR: UserRepository + ?Sized,
{
    match identifier {
        Identifier::Email(email) => repository.find_by_email(email).await,
        Identifier::Phone(phone) => repository.find_by_phone(phone).await,
    }
}

/// Clear the default flag on every address except `chosen`.
fn keep_single_default(addresses: &mut [Address], chosen: AddressId) {
    for address in addresses.iter_mut().filter(|a| a.id != chosen) {
        address.is_default = false;
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn list_addresses(&self, id: &UserId) -> Result<Vec<Address>, UserError> {
        Ok(self.load(id).await?.addresses)
    }

    async fn add_address(
        &self,
        id: &UserId,
        draft: AddressDraft,
    ) -> Result<Vec<Address>, UserError> {
        let address = Address::from_draft(draft);

        self.modify_addresses(id, |addresses| {
            if address.is_default {
                keep_single_default(addresses, address.id);
            }
            addresses.push(address.clone());
            Ok(())
        })
        .await
    }

    async fn update_address(
        &self,
        id: &UserId,
        address_id: &AddressId,
        draft: AddressDraft,
    ) -> Result<Vec<Address>, UserError> {
        let replacement = Address::with_id(*address_id, draft);

        self.modify_addresses(id, |addresses| {
            let slot = addresses
                .iter_mut()
                .find(|a| a.id == *address_id)
                .ok_or(UserError::AddressNotFound(address_id.to_string()))?;
            *slot = replacement.clone();

            if replacement.is_default {
                keep_single_default(addresses, *address_id);
            }
            Ok(())
        })
        .await
    }

    async fn delete_address(
        &self,
        id: &UserId,
        address_id: &AddressId,
    ) -> Result<Vec<Address>, UserError> {
        self.modify_addresses(id, |addresses| {
            let before = addresses.len();
            addresses.retain(|a| a.id != *address_id);
            if addresses.len() == before {
                return Err(UserError::AddressNotFound(address_id.to_string()));
            }
            Ok(())
        })
        .await
    }
}
