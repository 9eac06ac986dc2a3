pub mod errors;
pub mod hasher;

pub use errors::SecretError;
pub use hasher::SecretHasher;
