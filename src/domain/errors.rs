use thiserror::Error;

/// Failure taxonomy shared by all lifecycle managers. Variants carry
/// user-readable messages; the HTTP layer decides status codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),
    /// The operation is not permitted in the record's current lifecycle
    /// state (terminal order, duplicate pending payment, ...).
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Forbidden(String),
    /// An external gateway call failed; the message embeds what the
    /// gateway told us.
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}
