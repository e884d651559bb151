// src/application/mod.rs
pub mod assistant;
pub mod flashcard_generator;
pub mod normalizer;
pub mod note_synthesizer;
pub mod question_generator;
pub mod text_enhancer;
pub mod text_generator;

pub use assistant::{Assistant, ChatSession};
pub use flashcard_generator::FlashcardGenerator;
pub use normalizer::extract_json_array;
pub use note_synthesizer::{NoteFormat, SynthesisOptions, SynthesizedNote};
pub use question_generator::QuestionGenerator;
pub use text_enhancer::TextEnhancer;
pub use text_generator::{CredentialStore, TextGenerator};
