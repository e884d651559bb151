// src/domain/flashcard.rs
use crate::domain::{creation_id, DomainError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(default)]
    pub id: i64,
    pub front: String,
    pub back: String,
}

impl Flashcard {
    /// Create a card by hand, stamped with the current time as id
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: creation_id(),
            front: front.into(),
            back: back.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashcardStyle {
    /// Term - Definition
    #[default]
    Basic,
    Concept,
    /// Question - Answer
    Question,
}

impl FlashcardStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Concept => "concept",
            Self::Question => "question",
        }
    }
}

impl fmt::Display for FlashcardStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlashcardStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "concept" => Ok(Self::Concept),
            "question" => Ok(Self::Question),
            other => Err(DomainError::invalid("flashcard style", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(DomainError::invalid("difficulty", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_model_json_without_id_when_deserializing_then_id_defaults_to_zero() {
        let card: Flashcard = serde_json::from_str(r#"{"front":"Q1","back":"A1"}"#).unwrap();

        assert_eq!(card.id, 0);
        assert_eq!(card.front, "Q1");
        assert_eq!(card.back, "A1");
    }

    #[test]
    fn given_manual_card_when_creating_then_stamps_positive_id() {
        let card = Flashcard::new("Term", "Definition");
        assert!(card.id > 0);
    }

    #[test]
    fn given_mixed_case_when_parsing_style_then_accepts() {
        assert_eq!("Concept".parse::<FlashcardStyle>().unwrap(), FlashcardStyle::Concept);
        assert!("fancy".parse::<FlashcardStyle>().is_err());
    }

    #[test]
    fn given_difficulty_when_displaying_then_uses_lowercase_name() {
        assert_eq!(Difficulty::Hard.to_string(), "hard");
        assert_eq!(" easy ".parse::<Difficulty>().unwrap(), Difficulty::Easy);
    }
}
