pub mod claims;
pub mod codec;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use codec::DecodedToken;
pub use codec::IssuedToken;
pub use codec::TokenCodec;
pub use codec::TokenKind;
pub use errors::JwtError;
pub use handler::JwtHandler;
