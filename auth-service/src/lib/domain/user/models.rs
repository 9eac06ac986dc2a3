use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use phonenumber::Mode;
use uuid::Uuid;

use crate::user::errors::AddressError;
use crate::user::errors::DisplayNameError;
use crate::user::errors::EmailError;
use crate::user::errors::PhoneNumberError;
use crate::user::errors::RoleError;

/// User aggregate entity.
///
/// Identity, current credential and owned addresses of a shop account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub phone: PhoneNumber,
    pub email: EmailAddress,
    pub name: DisplayName,
    pub role: Role,
    pub credential: Credential,
    /// Generation counter, bumped by every credential write.
    pub credential_version: i64,
    pub addresses: Vec<Address>,
    /// Generation counter, bumped by every address list write.
    pub addresses_version: i64,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Phone number in E.164 form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse and normalise an international phone number.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not parseable as an international number
    /// * `NotValid` - Parseable but not an assignable number
    pub fn new(raw: &str) -> Result<Self, PhoneNumberError> {
        let trimmed = raw.trim();
        let candidate = if trimmed.starts_with('+') {
            trimmed.to_string()
        } else {
            format!("+{}", trimmed)
        };

        let parsed = candidate
            .parse::<phonenumber::PhoneNumber>()
            .map_err(|e| PhoneNumberError::InvalidFormat(e.to_string()))?;

        if !phonenumber::is_valid(&parsed) {
            return Err(PhoneNumberError::NotValid(trimmed.to_string()));
        }

        Ok(Self(parsed.format().mode(Mode::E164).to_string()))
    }

    /// Rehydrate a stored number without re-validating it.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name, 1 to 100 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 100;

    /// # Errors
    /// * `Empty` - Blank after trimming
    /// * `TooLong` - Longer than 100 characters
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length == 0 {
            Err(DisplayNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    Developer,
    #[default]
    User,
    Seller,
    Logistic,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Developer => "developer",
            Role::User => "user",
            Role::Seller => "seller",
            Role::Logistic => "logistic",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "developer" => Ok(Role::Developer),
            "user" => Ok(Role::User),
            "seller" => Ok(Role::Seller),
            "logistic" => Ok(Role::Logistic),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored secret of a user.
///
/// Exactly one of the two states is current. A consumed or expired
/// one-time code is replaced by a `Password` holding an unusable hash.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Password {
        hash: String,
    },
    OneTimeCode {
        hash: String,
        expires_at: DateTime<Utc>,
    },
}

impl Credential {
    pub fn hash(&self) -> &str {
        match self {
            Credential::Password { hash } | Credential::OneTimeCode { hash, .. } => hash,
        }
    }

    /// Expiry of a pending one-time code, `None` for a password.
    pub fn otp_expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Credential::Password { .. } => None,
            Credential::OneTimeCode { expires_at, .. } => Some(*expires_at),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Password { .. } => f.write_str("Password { .. }"),
            Credential::OneTimeCode { expires_at, .. } => f
                .debug_struct("OneTimeCode")
                .field("expires_at", expires_at)
                .finish_non_exhaustive(),
        }
    }
}

/// Login identifier: an email or a phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Email(String),
    Phone(String),
}

impl Identifier {
    /// Classify a raw identifier.
    ///
    /// Anything containing `@` is an email. Numeric input is normalised to
    /// E.164 when it parses, otherwise kept as typed.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if raw.contains('@') {
            return Identifier::Email(raw.to_string());
        }

        let looks_numeric = raw.starts_with('+') || raw.chars().all(|c| c.is_ascii_digit());
        if looks_numeric && !raw.is_empty() {
            if let Ok(phone) = PhoneNumber::new(raw) {
                return Identifier::Phone(phone.0);
            }
        }

        Identifier::Phone(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Identifier::Email(value) | Identifier::Phone(value) => value,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressId(pub Uuid);

impl AddressId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// # Errors
    /// * `InvalidId` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AddressError> {
        Uuid::parse_str(s)
            .map(AddressId)
            .map_err(|e| AddressError::InvalidId(e.to_string()))
    }
}

impl Default for AddressId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Delivery address owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: AddressId,
    pub address_line: String,
    pub pincode: String,
    pub landmark: Option<String>,
    pub city: String,
    pub state: String,
    pub nation: String,
    pub receiver_phone: String,
    pub is_default: bool,
}

impl Address {
    /// Materialise a draft under a fresh id.
    pub fn from_draft(draft: AddressDraft) -> Self {
        Self::with_id(AddressId::new(), draft)
    }

    pub fn with_id(id: AddressId, draft: AddressDraft) -> Self {
        Self {
            id,
            address_line: draft.address_line,
            pincode: draft.pincode,
            landmark: draft.landmark,
            city: draft.city,
            state: draft.state,
            nation: draft.nation,
            receiver_phone: draft.receiver_phone,
            is_default: draft.is_default,
        }
    }
}

/// Validated address fields without an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDraft {
    pub address_line: String,
    pub pincode: String,
    pub landmark: Option<String>,
    pub city: String,
    pub state: String,
    pub nation: String,
    pub receiver_phone: String,
    pub is_default: bool,
}

impl AddressDraft {
    /// Build a draft, rejecting blank required fields.
    ///
    /// # Errors
    /// * `MissingField` - A required field is empty after trimming
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        address_line: String,
        pincode: String,
        landmark: Option<String>,
        city: String,
        state: String,
        nation: String,
        receiver_phone: String,
        is_default: bool,
    ) -> Result<Self, AddressError> {
        Ok(Self {
            address_line: Self::required("address_line", address_line)?,
            pincode: Self::required("pincode", pincode)?,
            landmark: landmark
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            city: Self::required("city", city)?,
            state: Self::required("state", state)?,
            nation: Self::required("nation", nation)?,
            receiver_phone: Self::required("receiver_phone", receiver_phone)?,
            is_default,
        })
    }

    fn required(field: &'static str, value: String) -> Result<String, AddressError> {
        let value = value.trim().to_string();
        if value.is_empty() {
            Err(AddressError::MissingField(field))
        } else {
            Ok(value)
        }
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub phone: PhoneNumber,
    pub email: EmailAddress,
    pub name: DisplayName,
    pub address: Option<AddressDraft>,
    pub role: Role,
}

impl RegisterUserCommand {
    pub fn new(
        phone: PhoneNumber,
        email: EmailAddress,
        name: DisplayName,
        address: Option<AddressDraft>,
        role: Role,
    ) -> Self {
        Self {
            phone,
            email,
            name,
            address,
            role,
        }
    }
}
