// src/domain/question.rs
use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    #[serde(default)]
    pub id: i64,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default)]
    pub user_answer: Option<String>,
}

impl QuestionItem {
    pub fn is_choice(&self) -> bool {
        self.options.as_ref().is_some_and(|o| !o.is_empty())
    }

    /// Record the user's answer in place
    pub fn answer(&mut self, answer: impl Into<String>) {
        self.user_answer = Some(answer.into());
    }

    /// `None` until answered; comparison ignores case and surrounding whitespace
    pub fn is_correct(&self) -> Option<bool> {
        self.user_answer.as_ref().map(|given| {
            given.trim().to_lowercase() == self.correct_answer.trim().to_lowercase()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    ShortAnswer,
    Essay,
    TrueFalse,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiplechoice",
            Self::ShortAnswer => "shortanswer",
            Self::Essay => "essay",
            Self::TrueFalse => "truefalse",
        }
    }

    /// Wording used inside prompts
    pub fn label(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple choice",
            Self::ShortAnswer => "short answer",
            Self::Essay => "essay",
            Self::TrueFalse => "true/false",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        match normalized.as_str() {
            "multiplechoice" => Ok(Self::MultipleChoice),
            "shortanswer" => Ok(Self::ShortAnswer),
            "essay" => Ok(Self::Essay),
            "truefalse" => Ok(Self::TrueFalse),
            _ => Err(DomainError::invalid("question type", s)),
        }
    }
}
