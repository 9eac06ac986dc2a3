use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;

/// Outcome of an internal admin verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminVerdict {
    Granted { email: EmailAddress, role: Role },
    Denied,
}
