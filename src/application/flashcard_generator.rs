// src/application/flashcard_generator.rs
use crate::application::normalizer::{extract_json_array, UNPARSEABLE};
use crate::application::TextGenerator;
use crate::constants::{
    DEFAULT_MODEL, FLASHCARD_MIN_TOKENS, FLASHCARD_TEMPERATURE, FLASHCARD_TOKENS_PER_CARD,
};
use crate::domain::{
    creation_id, Difficulty, Flashcard, FlashcardStyle, GenerationError, GenerationRequest,
};
use serde_json::Value;
use tracing::{debug, info, instrument};

pub struct FlashcardGenerator<G: TextGenerator> {
    generator: G,
    model: String,
}

impl<G: TextGenerator> FlashcardGenerator<G> {
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

    /// Generate up to `count` cards from `source_text`.
    ///
    /// Returns fewer cards when the model produced fewer; that is not an error.
    #[instrument(level = "debug", skip(self, source_text), fields(source_len = source_text.len()))]
    pub fn generate(
        &self,
        source_text: &str,
        style: FlashcardStyle,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Flashcard>, GenerationError> {
        let request = GenerationRequest::new(build_prompt(source_text, style, difficulty, count))
            .with_temperature(FLASHCARD_TEMPERATURE)
            .with_max_output_tokens(token_budget(count))
            .with_model(self.model.as_str());

        let raw = self.generator.generate(&request)?;
        let items = extract_json_array(&raw, Some(count))?;
        debug!(parsed = items.len(), requested = count, "Extracted flashcard array");

        let cards = into_flashcards(items)?;
        info!(count = cards.len(), "Generated flashcards");
        Ok(cards)
    }
}

/// At least 2000 tokens, or 100 per requested card
pub fn token_budget(count: usize) -> u32 {
    let per_card = u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(FLASHCARD_TOKENS_PER_CARD);
    per_card.max(FLASHCARD_MIN_TOKENS)
}

fn into_flashcards(items: Vec<Value>) -> Result<Vec<Flashcard>, GenerationError> {
    let base_id = creation_id();
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let mut card: Flashcard = serde_json::from_value(item).map_err(|e| {
                debug!(error = %e, index, "Flashcard element has unexpected shape");
                GenerationError::Parse(UNPARSEABLE.to_string())
            })?;
            card.id = base_id + index as i64;
            Ok(card)
        })
        .collect()
}

pub fn build_prompt(
    source_text: &str,
    style: FlashcardStyle,
    difficulty: Difficulty,
    count: usize,
) -> String {
    format!(
        r#"Create {count} flashcards based on the ACADEMIC CONTENT in the text provided below.

IMPORTANT:
- Focus ONLY on factual information from the provided text
- DO NOT create flashcards about flashcards, UI elements, or the application itself
- DO NOT create flashcards that explain what a "flashcard" is or how to use the editor
- Each flashcard must be directly based on subject matter contained in the text
- The front should contain a clear concept, term, or question from the text
- The back should contain the definition, explanation, or answer from the text
- Use {style} style format and {difficulty} difficulty level

FORMAT YOUR RESPONSE AS JSON ARRAY:
[
  {{"front": "Term or concept from text", "back": "Definition or explanation from text"}},
  {{"front": "Question about text content", "back": "Answer from the text"}},
  ...
]

TEXT TO ANALYZE AND EXTRACT INFORMATION FROM:
{source_text}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::ScriptedGenerator;
    use rstest::rstest;

    #[rstest]
    #[case(1, 2000)]
    #[case(20, 2000)]
    #[case(25, 2500)]
    #[case(50, 5000)]
    fn given_card_count_when_budgeting_tokens_then_scales_above_floor(
        #[case] count: usize,
        #[case] expected: u32,
    ) {
        assert_eq!(token_budget(count), expected);
    }

    #[test]
    fn given_parameters_when_building_prompt_then_embeds_them() {
        let prompt = build_prompt("Mitochondria make ATP.", FlashcardStyle::Concept, Difficulty::Hard, 7);

        assert!(prompt.starts_with("Create 7 flashcards"));
        assert!(prompt.contains("Use concept style format and hard difficulty level"));
        assert!(prompt.contains("DO NOT create flashcards about flashcards"));
        assert!(prompt.ends_with("Mitochondria make ATP."));
    }

    #[test]
    fn given_request_when_generating_then_uses_flashcard_sampling() {
        let generator = ScriptedGenerator::with_responses(vec![Ok(
            r#"[{"front":"Q","back":"A"}]"#.to_string(),
        )]);
        let cards = FlashcardGenerator::new(&generator)
            .with_model("gemini-test")
            .generate("text", FlashcardStyle::Basic, Difficulty::Easy, 30)
            .unwrap();

        assert_eq!(cards.len(), 1);
        let request = &generator.requests()[0];
        assert_eq!(request.temperature, 0.2);
        assert_eq!(request.max_output_tokens, 3000);
        assert_eq!(request.model, "gemini-test");
    }

    #[test]
    fn given_elements_missing_back_when_generating_then_fails_whole_call() {
        let generator = ScriptedGenerator::with_responses(vec![Ok(
            r#"[{"front":"Q","back":"A"},{"front":"only"}]"#.to_string(),
        )]);

        let result = FlashcardGenerator::new(&generator).generate(
            "text",
            FlashcardStyle::Basic,
            Difficulty::Easy,
            5,
        );

        assert!(matches!(result, Err(GenerationError::Parse(_))));
    }

    #[test]
    fn given_several_cards_when_generating_then_ids_are_sequential() {
        let generator = ScriptedGenerator::with_responses(vec![Ok(
            r#"[{"front":"1","back":"a"},{"front":"2","back":"b"}]"#.to_string(),
        )]);

        let cards = FlashcardGenerator::new(&generator)
            .generate("text", FlashcardStyle::Basic, Difficulty::Easy, 5)
            .unwrap();

        assert_eq!(cards[1].id, cards[0].id + 1);
    }
}
