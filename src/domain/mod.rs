// src/domain/mod.rs
pub mod error;
pub mod flashcard;
pub mod generation;
pub mod question;
pub mod reference;
pub mod theme;

pub use error::{DomainError, GenerationError};
pub use flashcard::{Difficulty, Flashcard, FlashcardStyle};
pub use generation::GenerationRequest;
pub use question::{QuestionItem, QuestionType};
pub use reference::{Reference, ReferenceDraft, ReferenceLibrary, ReferenceType};
pub use theme::Theme;

/// Creation-time id in milliseconds since the epoch
pub fn creation_id() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
