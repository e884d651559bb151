// src/application/text_generator.rs
use crate::domain::{DomainError, GenerationError, GenerationRequest};

/// Single-shot text generation against a remote model
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

impl<G: TextGenerator + ?Sized> TextGenerator for &G {
    fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        (**self).generate(request)
    }
}

/// Holder of the API key authorizing generation calls
pub trait CredentialStore {
    /// Stored key, `None` when absent or empty
    fn api_key(&self) -> Result<Option<String>, DomainError>;

    /// Create or overwrite the key
    fn save_api_key(&mut self, key: &str) -> Result<(), DomainError>;

    fn remove_api_key(&mut self) -> Result<(), DomainError>;
}
