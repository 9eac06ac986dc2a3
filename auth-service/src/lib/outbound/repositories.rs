pub mod blacklist;
pub mod user;

pub use blacklist::PostgresBlacklistRepository;
pub use user::PostgresUserRepository;
