// src/application/text_enhancer.rs
use crate::application::TextGenerator;
use crate::constants::{DEFAULT_MODEL, ENHANCE_MAX_TOKENS, ENHANCE_TEMPERATURE, ENHANCE_TOP_P};
use crate::domain::{GenerationError, GenerationRequest, Reference};
use crate::util::text::reference_context_lines;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument};

lazy_static! {
    static ref LEADING_FENCE_REGEX: Regex =
        Regex::new(r"^```html|```$").expect("Failed to compile fence regex");
    static ref HTML_WRAPPER_REGEX: Regex =
        Regex::new(r"^\s*<html>|</html>\s*$").expect("Failed to compile html wrapper regex");
    static ref BODY_WRAPPER_REGEX: Regex =
        Regex::new(r"^\s*<body>|</body>\s*$").expect("Failed to compile body wrapper regex");
}

pub struct TextEnhancer<G: TextGenerator> {
    generator: G,
    model: String,
}

impl<G: TextGenerator> TextEnhancer<G> {
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

    /// Rewrite `text` following `instruction`; returns the raw model text.
    #[instrument(level = "debug", skip_all, fields(text_len = text.len()))]
    pub fn enhance(&self, text: &str, instruction: &str) -> Result<String, GenerationError> {
        let request = GenerationRequest::new(format!("{instruction}\n\nText to enhance:\n{text}"))
            .with_temperature(ENHANCE_TEMPERATURE)
            .with_max_output_tokens(ENHANCE_MAX_TOKENS)
            .with_top_p(ENHANCE_TOP_P)
            .with_model(self.model.as_str());

        let enhanced = self.generator.generate(&request)?;
        info!(output_len = enhanced.len(), "Enhanced text");
        Ok(enhanced)
    }

    /// Beautify notes into HTML, optionally drawing on references, and clean the result
    pub fn beautify(&self, text: &str, references: &[Reference]) -> Result<String, GenerationError> {
        let raw = self.enhance(text, &beautify_instruction(references))?;
        Ok(clean_html_response(&raw))
    }
}

/// Fixed instruction asking for structured, HTML-only notes
pub fn beautify_instruction(references: &[Reference]) -> String {
    let mut instruction = String::from(
        "Beautify and enhance these notes by: \n\
         1. Improving the structure with proper headings, paragraphs and bullet points\n\
         2. Fixing any grammar or spelling errors\n\
         3. Enhancing clarity and readability\n\
         4. Adding emphasis to important concepts\n\
         5. Keeping all the original content but making it more coherent\n",
    );
    if !references.is_empty() {
        instruction.push_str("6. Incorporating knowledge from the provided references where relevant\n");
    }
    instruction.push_str(
        "IMPORTANT: Return the beautified content with complete HTML formatting. \
         Use proper <h1>, <h2>, <strong>, <em>, <ul>, <li>, <p> tags. Do NOT return markdown format.",
    );
    if !references.is_empty() {
        instruction.push_str("\n\nConsider these references when enhancing the content:\n");
        instruction.push_str(&reference_context_lines(references));
    }
    instruction
}

/// Strip markdown fences, escaped angle brackets and document wrappers from HTML output
pub fn clean_html_response(raw: &str) -> String {
    let text = LEADING_FENCE_REGEX.replace_all(raw, "");
    let text = text.replace("&lt;", "<").replace("&gt;", ">");
    let text = HTML_WRAPPER_REGEX.replace_all(&text, "");
    let text = BODY_WRAPPER_REGEX.replace_all(&text, "");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::ScriptedGenerator;

    #[test]
    fn given_instruction_when_enhancing_then_concatenates_prompt_and_uses_low_temperature() {
        let generator = ScriptedGenerator::with_responses(vec![Ok("better".to_string())]);

        let result = TextEnhancer::new(&generator)
            .enhance("raw notes", "Fix grammar")
            .unwrap();

        assert_eq!(result, "better");
        let request = &generator.requests()[0];
        assert_eq!(request.prompt, "Fix grammar\n\nText to enhance:\nraw notes");
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_output_tokens, 1500);
        assert_eq!(request.top_p, 0.95);
    }

    #[test]
    fn given_remote_failure_when_enhancing_then_surfaces_error_unchanged() {
        let generator = ScriptedGenerator::with_responses(vec![Err(GenerationError::Network(
            "quota exceeded".to_string(),
        ))]);

        let result = TextEnhancer::new(&generator).enhance("x", "y");

        assert_eq!(
            result,
            Err(GenerationError::Network("quota exceeded".to_string()))
        );
    }

    #[test]
    fn given_fenced_html_document_when_cleaning_then_returns_fragment() {
        let raw = "```html\n<html><body><h1>Title</h1>&lt;p&gt;x&lt;/p&gt;</body></html>\n```";

        assert_eq!(clean_html_response(raw), "<h1>Title</h1><p>x</p>");
    }

    #[test]
    fn given_no_references_when_building_instruction_then_omits_reference_clause() {
        let instruction = beautify_instruction(&[]);

        assert!(instruction.contains("Do NOT return markdown format."));
        assert!(!instruction.contains("6. Incorporating"));
    }
}
