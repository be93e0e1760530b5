//! Question Service request and response types
//!
//! Field names follow the backend's JSON wire format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Explicit session identity passed to every service call
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// The four operations of the service contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GetQuestion,
    SubmitAnswer,
    AwardCompletion,
    QuitQuiz,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::GetQuestion => "get_question",
            Operation::SubmitAnswer => "submit_answer",
            Operation::AwardCompletion => "award_quiz_completion",
            Operation::QuitQuiz => "quit_quiz",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response to `getQuestion`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResponse {
    /// Absent (or empty) once the question stream is exhausted
    #[serde(default)]
    pub question: Option<String>,
    /// Session summary, only sent with the final (absent) question
    #[serde(default)]
    pub chat_evaluation: Option<String>,
    pub current_question_index: u32,
    pub total_questions: u32,
    pub current_child_index: u32,
    #[serde(rename = "get_current_child_count")]
    pub child_count: u32,
}

/// Request body for `submitAnswer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
    /// Question text the answer refers to (used server-side for answer rewriting)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

/// Evaluation category reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerScore {
    Perfect,
    Correct,
    Partial,
    Incorrect,
    #[serde(other)]
    Other,
}

/// Response to `submitAnswer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub feedback: String,
    pub score: AnswerScore,
    /// The question could not be answered properly and the service moved on
    #[serde(default)]
    pub improperly_answered: bool,
    /// Reference material; when present the same question is asked again.
    /// Its absence already means moving on, so `move_to_next` is not read.
    #[serde(default)]
    pub text: Option<String>,
}

/// Request body for `awardCompletion`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub score: u32,
}

/// Response to `awardCompletion`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub points_earned: u32,
}

/// Error body returned by the backend on non-success statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
