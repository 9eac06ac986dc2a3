use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum BlacklistError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}
