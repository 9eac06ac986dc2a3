use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::Address;
use crate::domain::user::models::AddressId;
use crate::domain::user::models::Credential;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PhoneNumber;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const SELECT_USER: &str = r#"
    SELECT id, phone_number, email, name, role, secret_hash, otp_expires_at,
           credential_version, addresses, addresses_version, created_at
    FROM users
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, filter: &str, value: &str) -> Result<Option<User>, UserError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE {} = $1", SELECT_USER, filter))
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    phone_number: String,
    email: String,
    name: String,
    role: String,
    secret_hash: String,
    otp_expires_at: Option<DateTime<Utc>>,
    credential_version: i64,
    addresses: Json<Vec<AddressRecord>>,
    addresses_version: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let credential = match row.otp_expires_at {
            Some(expires_at) => Credential::OneTimeCode {
                hash: row.secret_hash,
                expires_at,
            },
            None => Credential::Password {
                hash: row.secret_hash,
            },
        };

        Ok(User {
            id: UserId(row.id),
            phone: PhoneNumber::from_stored(row.phone_number),
            email: EmailAddress::new(row.email)?,
            name: DisplayName::new(row.name)?,
            role: row.role.parse()?,
            credential,
            credential_version: row.credential_version,
            addresses: row.addresses.0.into_iter().map(Address::from).collect(),
            addresses_version: row.addresses_version,
            created_at: row.created_at,
        })
    }
}

/// JSONB shape of one entry in `users.addresses`.
#[derive(Debug, Serialize, Deserialize)]
struct AddressRecord {
    id: Uuid,
    address_line: String,
    pincode: String,
    #[serde(default)]
    landmark: Option<String>,
    city: String,
    state: String,
    nation: String,
    receiver_phone: String,
    #[serde(default)]
    is_default: bool,
}

impl From<AddressRecord> for Address {
    fn from(record: AddressRecord) -> Self {
        Address {
            id: AddressId(record.id),
            address_line: record.address_line,
            pincode: record.pincode,
            landmark: record.landmark,
            city: record.city,
            state: record.state,
            nation: record.nation,
            receiver_phone: record.receiver_phone,
            is_default: record.is_default,
        }
    }
}

impl From<&Address> for AddressRecord {
    fn from(address: &Address) -> Self {
        AddressRecord {
            id: address.id.0,
            address_line: address.address_line.clone(),
            pincode: address.pincode.clone(),
            landmark: address.landmark.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            nation: address.nation.clone(),
            receiver_phone: address.receiver_phone.clone(),
            is_default: address.is_default,
        }
    }
}

fn address_records(addresses: &[Address]) -> Json<Vec<AddressRecord>> {
    Json(addresses.iter().map(AddressRecord::from).collect())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, phone_number, email, name, role, secret_hash,
                               otp_expires_at, credential_version, addresses,
                               addresses_version, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id.0)
        .bind(user.phone.as_str())
        .bind(user.email.as_str())
        .bind(user.name.as_str())
        .bind(user.role.as_str())
        .bind(user.credential.hash())
        .bind(user.credential.otp_expires_at())
        .bind(user.credential_version)
        .bind(address_records(&user.addresses))
        .bind(user.addresses_version)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("users_email_key") {
                        return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                    }
                    if db_err.constraint() == Some("users_phone_number_key") {
                        return UserError::PhoneAlreadyExists(user.phone.as_str().to_string());
                    }
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        self.find_one("email", email).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, UserError> {
        self.find_one("phone_number", phone).await
    }

    async fn store_credential(
        &self,
        id: &UserId,
        credential: &Credential,
    ) -> Result<i64, UserError> {
        let version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET secret_hash = $2,
                otp_expires_at = $3,
                credential_version = credential_version + 1
            WHERE id = $1
            RETURNING credential_version
            "#,
        )
        .bind(id.0)
        .bind(credential.hash())
        .bind(credential.otp_expires_at())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        version.ok_or(UserError::NotFound(id.to_string()))
    }

    async fn swap_credential(
        &self,
        id: &UserId,
        expected_version: i64,
        credential: &Credential,
    ) -> Result<bool, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET secret_hash = $3,
                otp_expires_at = $4,
                credential_version = credential_version + 1
            WHERE id = $1 AND credential_version = $2
            "#,
        )
        .bind(id.0)
        .bind(expected_version)
        .bind(credential.hash())
        .bind(credential.otp_expires_at())
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    async fn swap_addresses(
        &self,
        id: &UserId,
        expected_version: i64,
        addresses: &[Address],
    ) -> Result<bool, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET addresses = $3,
                addresses_version = addresses_version + 1
            WHERE id = $1 AND addresses_version = $2
            "#,
        )
        .bind(id.0)
        .bind(expected_version)
        .bind(address_records(addresses))
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_without_otp_expiry_is_password() {
        let row = UserRow {
            id: Uuid::new_v4(),
            phone_number: "+16502530000".to_string(),
            email: "a@x.com".to_string(),
            name: "A".to_string(),
            role: "seller".to_string(),
            secret_hash: "$argon2id$hash".to_string(),
            otp_expires_at: None,
            credential_version: 3,
            addresses: Json(vec![]),
            addresses_version: 1,
            created_at: Utc::now(),
        };

        let user = User::try_from(row).expect("Row should map");
        assert!(matches!(user.credential, Credential::Password { .. }));
        assert_eq!(user.role.as_str(), "seller");
        assert_eq!(user.credential_version, 3);
    }

    #[test]
    fn test_row_with_unknown_role_is_rejected() {
        let row = UserRow {
            id: Uuid::new_v4(),
            phone_number: "+16502530000".to_string(),
            email: "a@x.com".to_string(),
            name: "A".to_string(),
            role: "superuser".to_string(),
            secret_hash: "$argon2id$hash".to_string(),
            otp_expires_at: Some(Utc::now()),
            credential_version: 1,
            addresses: Json(vec![]),
            addresses_version: 1,
            created_at: Utc::now(),
        };

        assert!(matches!(
            User::try_from(row),
            Err(UserError::InvalidRole(_))
        ));
    }

    #[test]
    fn test_address_record_tolerates_missing_optional_fields() {
        let records: Vec<AddressRecord> = serde_json::from_value(serde_json::json!([{
            "id": "6f1c1f0e-0000-4000-8000-000000000001",
            "address_line": "12 Main St",
            "pincode": "560001",
            "city": "Bengaluru",
            "state": "KA",
            "nation": "IN",
            "receiver_phone": "+919876543210"
        }]))
        .expect("Record should deserialize");

        let address = Address::from(records.into_iter().next().unwrap());
        assert_eq!(address.landmark, None);
        assert!(!address.is_default);
    }
}
