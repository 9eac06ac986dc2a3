//! Service-to-service admin verification.
//!
//! Lets an admin console check admin credentials against the auth service's
//! user store over HTTP instead of reading the database directly.

pub mod client;
pub mod errors;
pub mod messages;

pub use client::VerificationClient;
pub use errors::VerificationError;
pub use messages::VerifyUserRequest;
pub use messages::VerifyUserResponse;
pub use messages::INTERNAL_TOKEN_HEADER;
pub use messages::SESSION_SENTINEL;
pub use messages::VERIFY_USER_PATH;
