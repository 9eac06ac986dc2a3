use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for PhoneNumber validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    #[error("Invalid phone number format: {0}")]
    InvalidFormat(String),

    #[error("Phone number is not valid: {0}")]
    NotValid(String),
}

/// Error for DisplayName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Name must not be empty")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Error for address validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Missing required address field: {0}")]
    MissingField(&'static str),

    #[error("Invalid address id: {0}")]
    InvalidId(String),
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(#[from] PhoneNumberError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] DisplayNameError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User not found with identifier: {0}")]
    NotFoundByIdentifier(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Phone number already exists: {0}")]
    PhoneAlreadyExists(String),

    #[error("Address not found: {0}")]
    AddressNotFound(String),

    #[error("Addresses changed concurrently for user: {0}")]
    ConcurrentModification(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
