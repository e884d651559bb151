// src/domain/error.rs
use thiserror::Error;

/// Failure of a single generation call. None of these are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Format error: {0}")]
    Format(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl GenerationError {
    pub fn missing_api_key() -> Self {
        Self::Auth("missing API key".to_string())
    }

    pub fn unexpected_shape() -> Self {
        Self::Format("unexpected response shape".to_string())
    }

    /// The message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Auth(msg) | Self::Network(msg) | Self::Format(msg) | Self::Parse(msg) => msg,
        }
    }
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Reference not found: {0}")]
    ReferenceNotFound(i64),
    #[error("No references available")]
    NoReferences,
    #[error("Missing information: {0}")]
    MissingField(&'static str),
    #[error("Priority must be between 1 and 5, got {0}")]
    InvalidPriority(u8),
    #[error("File too large: {name} is {size} bytes, maximum is {limit_mb}MB")]
    FileTooLarge {
        name: String,
        size: u64,
        limit_mb: u64,
    },
    #[error("Total references size exceeded: maximum combined size is {limit_mb}MB")]
    TotalSizeExceeded { limit_mb: u64 },
    #[error("Invalid {kind}: {value}")]
    InvalidValue { kind: &'static str, value: String },
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl DomainError {
    pub fn invalid(kind: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_network_error_when_reading_message_then_returns_payload_only() {
        let err = GenerationError::Network("quota exceeded".to_string());
        assert_eq!(err.message(), "quota exceeded");
        assert_eq!(err.to_string(), "Network error: quota exceeded");
    }

    #[test]
    fn given_missing_key_constructor_when_called_then_is_auth_error() {
        assert_eq!(
            GenerationError::missing_api_key(),
            GenerationError::Auth("missing API key".to_string())
        );
    }
}
