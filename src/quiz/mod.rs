//! Quiz question model, parsing and validation
//!
//! Model output goes through three steps before it becomes a [`QuizQuestion`]:
//! fence stripping, JSON deserialization, then invariant checks.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

mod fence;
mod prompt;

pub use fence::strip_code_fence;
pub use prompt::QUIZ_PROMPT;

/// Correct answer(s) of a quiz question
///
/// Serialized untagged: a plain string for single-answer questions,
/// an array for multi-answer questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: Answer,
}

/// Invariant violations found after a quiz deserialized successfully
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizValidationError {
    #[error("question text is empty")]
    EmptyQuestion,

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("expected 4 or 5 options, got {0}")]
    OptionCount(usize),

    #[error("option '{0}' appears more than once")]
    DuplicateOption(String),

    #[error("a question with 4 options must have a single string answer")]
    ExpectedSingleAnswer,

    #[error("a question with 5 options must have exactly 2 answers, got {0}")]
    ExpectedTwoAnswers(usize),

    #[error("answer '{0}' is not one of the options")]
    AnswerNotAnOption(String),

    #[error("answer '{0}' is listed more than once")]
    DuplicateAnswer(String),
}

/// Why model output could not be turned into a [`QuizQuestion`]
#[derive(Debug, Error)]
pub enum QuizParseError {
    #[error("Failed to parse content as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Quiz failed validation: {0}")]
    Invalid(#[from] QuizValidationError),
}

impl QuizQuestion {
    /// Check option cardinality and answer membership
    ///
    /// - 4 options: `answer` is one string equal to an option
    /// - 5 options: `answer` is two distinct strings, each equal to an option
    pub fn validate(&self) -> Result<(), QuizValidationError> {
        if self.question.trim().is_empty() {
            return Err(QuizValidationError::EmptyQuestion);
        }

        let mut seen = HashSet::new();
        for (index, option) in self.options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(QuizValidationError::EmptyOption { index });
            }
            if !seen.insert(option.as_str()) {
                return Err(QuizValidationError::DuplicateOption(option.clone()));
            }
        }

        match (self.options.len(), &self.answer) {
            (4, Answer::Single(answer)) => self.check_member(answer),
            (4, Answer::Multiple(_)) => Err(QuizValidationError::ExpectedSingleAnswer),
            (5, Answer::Multiple(answers)) => {
                if answers.len() != 2 {
                    return Err(QuizValidationError::ExpectedTwoAnswers(answers.len()));
                }
                if answers[0] == answers[1] {
                    return Err(QuizValidationError::DuplicateAnswer(answers[0].clone()));
                }
                answers.iter().try_for_each(|a| self.check_member(a))
            }
            (5, Answer::Single(_)) => Err(QuizValidationError::ExpectedTwoAnswers(1)),
            (count, _) => Err(QuizValidationError::OptionCount(count)),
        }
    }

    fn check_member(&self, answer: &str) -> Result<(), QuizValidationError> {
        if self.options.iter().any(|o| o == answer) {
            Ok(())
        } else {
            Err(QuizValidationError::AnswerNotAnOption(answer.to_string()))
        }
    }
}

/// Turn raw model output into a validated quiz question
///
/// Strips an optional code fence, deserializes, then validates.
pub fn parse_quiz(content: &str) -> Result<QuizQuestion, QuizParseError> {
    let quiz: QuizQuestion = serde_json::from_str(strip_code_fence(content))?;
    quiz.validate()?;
    Ok(quiz)
}
