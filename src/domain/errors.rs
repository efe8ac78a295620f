use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed id, missing field, empty item list, unknown enum value.
    #[error("{0}")]
    Validation(String),
    /// A referenced product or menu is missing, or a product is unavailable.
    #[error("{0}")]
    Resolution(String),
    /// The caller's role may reach the target status but the order is not in
    /// the required source status.
    #[error("{0}")]
    InvalidTransition(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        DomainError::Forbidden(msg.into())
    }
}
