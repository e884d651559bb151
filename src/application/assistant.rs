// src/application/assistant.rs
use crate::application::TextGenerator;
use crate::constants::{
    ASSISTANT_CHAT_TOKENS, ASSISTANT_CONTEXT_TOKENS, ASSISTANT_TEMPERATURE, ASSISTANT_TOP_K,
    ASSISTANT_TOP_P, DEFAULT_MODEL, STUDY_NOTES_TEMPERATURE, STUDY_NOTES_TOKENS,
};
use crate::domain::{creation_id, GenerationError, GenerationRequest, Reference};
use crate::util::text::reference_context_lines;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{instrument, warn};

pub const APOLOGY_MESSAGE: &str =
    "I'm sorry, I encountered an error when processing your request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: i64,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Free-form study help backed by the generation port
pub struct Assistant<G: TextGenerator> {
    generator: G,
    model: String,
}

impl<G: TextGenerator> Assistant<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn request(&self, prompt: String, temperature: f32, max_tokens: u32) -> GenerationRequest {
        GenerationRequest::new(prompt)
            .with_temperature(temperature)
            .with_max_output_tokens(max_tokens)
            .with_top_p(ASSISTANT_TOP_P)
            .with_top_k(ASSISTANT_TOP_K)
            .with_model(self.model.as_str())
    }

    /// Answer a single chat prompt
    #[instrument(level = "debug", skip_all)]
    pub fn ask(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = self.request(prompt.to_string(), ASSISTANT_TEMPERATURE, ASSISTANT_CHAT_TOKENS);
        self.generator.generate(&request)
    }

    /// Answer a prompt about a piece of note content, optionally grounded in references
    #[instrument(level = "debug", skip_all, fields(content_len = content.len()))]
    pub fn ask_about(
        &self,
        content: &str,
        prompt: &str,
        references: &[Reference],
    ) -> Result<String, GenerationError> {
        let request = self.request(
            contextual_prompt(content, prompt, references),
            ASSISTANT_TEMPERATURE,
            ASSISTANT_CONTEXT_TOKENS,
        );
        self.generator.generate(&request)
    }

    /// Markdown study notes on a topic
    #[instrument(level = "debug", skip(self, references))]
    pub fn study_notes(&self, topic: &str, references: &[Reference]) -> Result<String, GenerationError> {
        let request = self.request(
            study_notes_prompt(topic, references),
            STUDY_NOTES_TEMPERATURE,
            STUDY_NOTES_TOKENS,
        );
        self.generator.generate(&request)
    }
}

pub fn contextual_prompt(content: &str, prompt: &str, references: &[Reference]) -> String {
    if content.trim().is_empty() {
        return prompt.to_string();
    }
    let reference_context = if references.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nRelevant reference materials:\n{}",
            reference_context_lines(references)
        )
    };
    format!("Based on the following content:{reference_context}\n\n{content}\n\n{prompt}")
}

pub fn study_notes_prompt(topic: &str, references: &[Reference]) -> String {
    let mut prompt = format!(
        "Generate comprehensive and well-structured study notes about \"{}\".\n\
         Include key concepts, definitions, examples, and explanations.\n\
         Organize the content with clear headings and bullet points where appropriate.\n\
         Format the response using markdown.",
        topic.trim()
    );
    if !references.is_empty() {
        prompt.push_str("\n\nIncorporate information from these reference materials:\n");
        prompt.push_str(&reference_context_lines(references));
    }
    prompt
}

/// Transcript of a chat with the assistant
pub struct ChatSession<G: TextGenerator> {
    assistant: Assistant<G>,
    messages: Vec<ChatMessage>,
}

impl<G: TextGenerator> ChatSession<G> {
    pub fn new(assistant: Assistant<G>) -> Self {
        Self {
            assistant,
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, role: Role, content: String) {
        let id = self
            .messages
            .last()
            .map_or_else(creation_id, |last| last.id + 1)
            .max(creation_id());
        self.messages.push(ChatMessage {
            id,
            role,
            content,
            timestamp: Utc::now(),
        });
    }

    /// Send one user message. A failed call still leaves an assistant reply in the transcript.
    pub fn send(&mut self, input: &str) -> Result<&ChatMessage, GenerationError> {
        let input = input.trim();
        self.push(Role::User, input.to_string());

        match self.assistant.ask(input) {
            Ok(reply) => {
                self.push(Role::Assistant, reply);
                Ok(&self.messages[self.messages.len() - 1])
            }
            Err(e) => {
                warn!(error = %e, "Assistant request failed");
                self.push(Role::Assistant, APOLOGY_MESSAGE.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::ScriptedGenerator;

    #[test]
    fn given_chat_prompt_when_asking_then_uses_chat_sampling() {
        let generator = ScriptedGenerator::with_responses(vec![Ok("Hi".to_string())]);

        let reply = Assistant::new(&generator).ask("Hello").unwrap();

        assert_eq!(reply, "Hi");
        let request = &generator.requests()[0];
        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.max_output_tokens, 1000);
        assert_eq!(request.top_p, 0.8);
        assert_eq!(request.top_k, Some(40));
    }

    #[test]
    fn given_empty_content_when_building_contextual_prompt_then_returns_prompt_only() {
        assert_eq!(contextual_prompt("  ", "Explain", &[]), "Explain");
    }

    #[test]
    fn given_content_when_building_contextual_prompt_then_wraps_it() {
        let prompt = contextual_prompt("Cells divide.", "Summarize", &[]);
        assert_eq!(prompt, "Based on the following content:\n\nCells divide.\n\nSummarize");
    }

    #[test]
    fn given_topic_when_building_study_notes_prompt_then_requests_markdown() {
        let prompt = study_notes_prompt(" Photosynthesis ", &[]);

        assert!(prompt.contains("study notes about \"Photosynthesis\""));
        assert!(prompt.ends_with("Format the response using markdown."));
    }

    #[test]
    fn given_failed_call_when_sending_then_appends_apology_and_returns_error() {
        let generator = ScriptedGenerator::with_responses(vec![Err(GenerationError::missing_api_key())]);
        let mut session = ChatSession::new(Assistant::new(&generator));

        let result = session.send("Hello");

        assert_eq!(result.err(), Some(GenerationError::missing_api_key()));
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].role, Role::Assistant);
        assert_eq!(session.messages()[1].content, APOLOGY_MESSAGE);
    }

    #[test]
    fn given_two_turns_when_sending_then_transcript_ids_increase() {
        let generator = ScriptedGenerator::with_responses(vec![
            Ok("one".to_string()),
            Ok("two".to_string()),
        ]);
        let mut session = ChatSession::new(Assistant::new(&generator));

        session.send("first").unwrap();
        let reply = session.send("second").unwrap().content.clone();

        assert_eq!(reply, "two");
        let ids: Vec<i64> = session.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
