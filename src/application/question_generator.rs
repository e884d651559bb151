// src/application/question_generator.rs
use crate::application::normalizer::{extract_json_array, UNPARSEABLE};
use crate::application::TextGenerator;
use crate::constants::{DEFAULT_MODEL, QUESTION_MAX_TOKENS, QUESTION_TEMPERATURE};
use crate::domain::{
    creation_id, Difficulty, GenerationError, GenerationRequest, QuestionItem, QuestionType,
};
use serde_json::Value;
use tracing::{debug, info, instrument};

pub struct QuestionGenerator<G: TextGenerator> {
    generator: G,
    model: String,
}

impl<G: TextGenerator> QuestionGenerator<G> {
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

    /// Generate practice questions; every item starts unanswered.
    ///
    /// `context` steers subject framing and audience, it is prepended to the prompt.
    #[instrument(level = "debug", skip(self, source_text, context), fields(source_len = source_text.len()))]
    pub fn generate(
        &self,
        source_text: &str,
        question_type: QuestionType,
        difficulty: Difficulty,
        count: usize,
        context: Option<&str>,
    ) -> Result<Vec<QuestionItem>, GenerationError> {
        let prompt = build_prompt(source_text, question_type, difficulty, count, context);
        let request = GenerationRequest::new(prompt)
            .with_temperature(QUESTION_TEMPERATURE)
            .with_max_output_tokens(QUESTION_MAX_TOKENS)
            .with_model(self.model.as_str());

        let raw = self.generator.generate(&request)?;
        let items = extract_json_array(&raw, None)?;

        let questions = into_questions(items)?;
        info!(count = questions.len(), %question_type, "Generated questions");
        Ok(questions)
    }
}

fn into_questions(items: Vec<Value>) -> Result<Vec<QuestionItem>, GenerationError> {
    let base_id = creation_id();
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let mut question: QuestionItem = serde_json::from_value(item).map_err(|e| {
                debug!(error = %e, index, "Question element has unexpected shape");
                GenerationError::Parse(UNPARSEABLE.to_string())
            })?;
            question.id = base_id + index as i64;
            question.user_answer = None;
            Ok(question)
        })
        .collect()
}

fn response_shape(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::MultipleChoice => {
            r#"[
  {
    "question": "Question text here?",
    "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
    "correctAnswer": "The correct option here",
    "explanation": "Brief explanation of the answer"
  }
]"#
        }
        _ => {
            r#"[
  {
    "question": "Question text here?",
    "correctAnswer": "The correct answer here",
    "explanation": "Brief explanation of the answer"
  }
]"#
        }
    }
}

pub fn build_prompt(
    source_text: &str,
    question_type: QuestionType,
    difficulty: Difficulty,
    count: usize,
    context: Option<&str>,
) -> String {
    let context = context.map(str::trim).filter(|c| !c.is_empty());
    let mut prompt = String::new();

    if let Some(context) = context {
        prompt.push_str(&format!("Context: {context}\n\n"));
    }
    prompt.push_str(&format!(
        "Create {count} {label} questions based on the following content.\n\
         Each question should test understanding of key concepts in the text.\n\
         Make sure each question has a clear answer that can be found in the text.\n\
         Difficulty level: {difficulty}.\n\n",
        label = question_type.label(),
    ));
    if context.is_some() {
        prompt.push_str(
            "Use the provided context to tailor questions appropriately for this subject and audience.\n\n",
        );
    }
    if question_type == QuestionType::TrueFalse {
        prompt.push_str("The correctAnswer must be either \"True\" or \"False\".\n\n");
    }
    prompt.push_str("Format the response as a valid JSON array with the following structure:\n");
    prompt.push_str(response_shape(question_type));
    prompt.push_str("\n\nThe content to base questions on is:\n");
    prompt.push_str(source_text);
    prompt
}
