use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Operation failed: {0}")]
    OperationFailed(String),
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("Negotiation failed: {0}")]
    Negotiation(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::MalformedPayload(e.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
