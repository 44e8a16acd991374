// Error types surfaced by the adapter

/// Adapter error types
///
/// Only two failures are raised by the adapter itself (a missing user id on
/// update and a failed verification-token delete). Everything else is the
/// driver error, passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("No user id.")]
    MissingUserId,

    /// `update_user` was given an id with no stored user
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("No verification token found.")]
    VerificationToken(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AdapterResult<T> = Result<T, AdapterError>;
