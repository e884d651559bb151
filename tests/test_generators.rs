use studyaid::application::{Assistant, ChatSession, FlashcardGenerator, QuestionGenerator, TextEnhancer};
use studyaid::domain::{Difficulty, FlashcardStyle, GenerationError, QuestionType};
use studyaid::infrastructure::GeminiClient;
use studyaid::util::testing::{InMemoryCredentials, ScriptedGenerator, SpyTransport};

fn cards_json(count: usize) -> String {
    let cards: Vec<String> = (1..=count)
        .map(|i| format!(r#"{{"front":"Q{i}","back":"A{i}"}}"#))
        .collect();
    format!("[{}]", cards.join(","))
}

#[test]
fn given_ten_requested_and_seven_returned_when_generating_flashcards_then_returns_seven() {
    // Arrange
    let generator = ScriptedGenerator::with_responses(vec![Ok(cards_json(7))]);

    // Act
    let cards = FlashcardGenerator::new(&generator)
        .generate("Cell biology", FlashcardStyle::Basic, Difficulty::Medium, 10)
        .unwrap();

    // Assert
    assert_eq!(cards.len(), 7);
    assert_eq!(cards[6].front, "Q7");
}

#[test]
fn given_more_cards_than_requested_when_generating_then_truncates_to_count() {
    let generator = ScriptedGenerator::with_responses(vec![Ok(cards_json(12))]);

    let cards = FlashcardGenerator::new(&generator)
        .generate("Cell biology", FlashcardStyle::Concept, Difficulty::Hard, 5)
        .unwrap();

    assert_eq!(cards.len(), 5);
    assert_eq!(cards[4].back, "A5");
}

#[test]
fn given_generated_cards_when_stamping_ids_then_ids_are_consecutive() {
    let generator = ScriptedGenerator::with_responses(vec![Ok(cards_json(3))]);

    let cards = FlashcardGenerator::new(&generator)
        .generate("text", FlashcardStyle::Question, Difficulty::Easy, 3)
        .unwrap();

    assert_eq!(cards[1].id, cards[0].id + 1);
    assert_eq!(cards[2].id, cards[0].id + 2);
}

#[test]
fn given_model_prose_without_array_when_generating_then_fails_with_parse_error() {
    let generator =
        ScriptedGenerator::with_responses(vec![Ok("I cannot help with that.".to_string())]);

    let result = FlashcardGenerator::new(&generator).generate(
        "text",
        FlashcardStyle::Basic,
        Difficulty::Medium,
        3,
    );

    assert_eq!(
        result,
        Err(GenerationError::Parse("no array delimiters found".to_string()))
    );
}

#[test]
fn given_missing_key_when_generating_through_client_then_auth_error_surfaces_unchanged() {
    let spy = SpyTransport::new();
    let client = GeminiClient::new(&spy, InMemoryCredentials::empty());

    let result = FlashcardGenerator::new(&client).generate(
        "text",
        FlashcardStyle::Basic,
        Difficulty::Medium,
        3,
    );

    assert_eq!(result, Err(GenerationError::Auth("missing API key".to_string())));
    assert_eq!(spy.call_count(), 0);
}

#[test]
fn given_client_with_fenced_reply_when_generating_questions_then_parses_items() {
    let reply = r#"Here are your questions:
```json
[{"question":"Is water wet?","correctAnswer":"True","explanation":"By convention"}]
```"#;
    let body = serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": reply}]}}]
    });
    let spy = SpyTransport::new().respond(200, body.to_string());
    let client = GeminiClient::new(&spy, InMemoryCredentials::with_key("k"));

    let questions = QuestionGenerator::new(&client)
        .generate("Water", QuestionType::TrueFalse, Difficulty::Easy, 1, None)
        .unwrap();

    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].correct_answer, "True");
    assert_eq!(questions[0].user_answer, None);
    let sent = spy.requests()[0].body.clone().unwrap();
    assert_eq!(sent["generationConfig"]["maxOutputTokens"], serde_json::json!(2500));
}

#[test]
fn given_network_failure_when_enhancing_then_error_is_not_swallowed() {
    let generator = ScriptedGenerator::with_responses(vec![Err(GenerationError::Network(
        "quota exceeded".to_string(),
    ))]);

    let result = TextEnhancer::new(&generator).enhance("draft", "Fix grammar");

    assert_eq!(result, Err(GenerationError::Network("quota exceeded".to_string())));
}

#[test]
fn given_failing_turn_when_chatting_then_transcript_keeps_apology() {
    let generator = ScriptedGenerator::with_responses(vec![
        Ok("Mitochondria".to_string()),
        Err(GenerationError::Network("timeout".to_string())),
    ]);
    let mut session = ChatSession::new(Assistant::new(&generator));

    session.send("Powerhouse of the cell?").unwrap();
    let second = session.send("And the nucleus?");

    assert!(second.is_err());
    let messages = session.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[1].content, "Mitochondria");
    assert!(messages.windows(2).all(|pair| pair[0].id < pair[1].id));
}
