// src/constants.rs
//
// Application-wide constants: remote endpoint defaults, sampling parameters
// per use case, and reference upload limits.

/// Base URL of the generative-language API.
///
/// Requests go to `{base}/v1beta/models/{model}:generateContent?key={key}`.
/// Overridable through `[generation] base_url` in the config file.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when neither the caller nor the config names one.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Sampling defaults applied to every request unless overridden.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 800;
pub const DEFAULT_TOP_P: f32 = 0.95;

/// Flashcards favour factual output; token budget grows with the card count.
///
/// Used in: `application/flashcard_generator.rs`
pub const FLASHCARD_TEMPERATURE: f32 = 0.2;
pub const FLASHCARD_MIN_TOKENS: u32 = 2000;
pub const FLASHCARD_TOKENS_PER_CARD: u32 = 100;

/// Used in: `application/question_generator.rs`
pub const QUESTION_TEMPERATURE: f32 = 0.4;
pub const QUESTION_MAX_TOKENS: u32 = 2500;

/// Enhancement favours determinism over creativity.
///
/// Used in: `application/text_enhancer.rs`
pub const ENHANCE_TEMPERATURE: f32 = 0.3;
pub const ENHANCE_MAX_TOKENS: u32 = 1500;
pub const ENHANCE_TOP_P: f32 = 0.95;

/// Assistant sampling: free chat, questions about a note, and topic notes.
///
/// Used in: `application/assistant.rs`
pub const ASSISTANT_TEMPERATURE: f32 = 0.7;
pub const ASSISTANT_TOP_P: f32 = 0.8;
pub const ASSISTANT_TOP_K: u32 = 40;
pub const ASSISTANT_CHAT_TOKENS: u32 = 1000;
pub const ASSISTANT_CONTEXT_TOKENS: u32 = 1200;
pub const STUDY_NOTES_TEMPERATURE: f32 = 0.5;
pub const STUDY_NOTES_TOKENS: u32 = 2000;

/// Logical key names inside the local key-value store.
pub const API_KEY_STORAGE_KEY: &str = "gemini-api-key";
pub const THEME_STORAGE_KEY: &str = "theme";

/// Per-file and aggregate limits for attached reference files, in MB.
pub const MAX_FILE_SIZE_MB: u64 = 5;
pub const MAX_FILE_SIZE_PDF_MB: u64 = 10;
pub const MAX_TOTAL_REFERENCES_MB: u64 = 25;

/// Reference priority range, inclusive.
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

/// Combined notes expand the top reference plus this many more.
///
/// Used in: `application/note_synthesizer.rs`
pub const MAX_EXPANDED_REFERENCES: usize = 5;

/// Delay in milliseconds after writing the HTML file before opening the browser.
///
/// Without it some browsers open an empty or incomplete file.
///
/// Used in: `infrastructure/renderer.rs`
pub const BROWSER_LAUNCH_DELAY_MS: u64 = 500;
