pub mod blacklist;
pub mod session;
pub mod user;

#[cfg(test)]
pub(crate) mod mocks;
