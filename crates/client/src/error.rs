use thiserror::Error;

use fleetdesk_auth::CredentialError;
use fleetdesk_core::DomainError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a store operation.
///
/// `Validation` is raised before anything is sent; the other variants come
/// from the round trip.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("network error: {0}")]
    Transport(String),

    /// Non-2xx response. `message` is the server's own text when it sent one.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("credential error: {0}")]
    Credential(String),
}

impl ApiError {
    /// Text recorded in a store's `error` field.
    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(msg) | ApiError::Status { message: msg, .. } => msg.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        ApiError::Credential(err.to_string())
    }
}
