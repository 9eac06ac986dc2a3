use thiserror::Error;

/// Error type for internal verification calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Internal token rejected by auth service")]
    Forbidden,

    #[error("Upstream verification failed: {0}")]
    UpstreamFailure(String),
}
