//! Position within the two-level question hierarchy

use super::log::{ChatEntry, MessageLog};
use crate::service::QuestionResponse;
use serde::{Deserialize, Serialize};

/// Summary shown when the service ends a session without one
pub const DEFAULT_SUMMARY: &str = "Quiz completed!";

/// Where the session is: top-level question and side-quest sub-question.
///
/// Invariant: `question_index <= total_questions` and `child_index <= child_count`.
/// `child_count == 0` means the current question has no side quest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub question_index: u32,
    pub total_questions: u32,
    pub child_index: u32,
    pub child_count: u32,
}

impl CursorPosition {
    /// Build a position from a service response, clamping indices into range
    pub fn from_response(response: &QuestionResponse) -> Self {
        let position = Self {
            question_index: response
                .current_question_index
                .min(response.total_questions),
            total_questions: response.total_questions,
            child_index: response.current_child_index.min(response.child_count),
            child_count: response.child_count,
        };
        if position.question_index != response.current_question_index
            || position.child_index != response.current_child_index
        {
            tracing::debug!(
                question_index = response.current_question_index,
                total_questions = response.total_questions,
                child_index = response.current_child_index,
                child_count = response.child_count,
                "Clamped out-of-range cursor position"
            );
        }
        position
    }

    pub fn question_progress(&self) -> Progress {
        Progress {
            label: "Questions",
            current: self.question_index,
            max: self.total_questions,
        }
    }

    /// Side-quest progress, only while a side quest is underway
    pub fn side_quest_progress(&self) -> Option<Progress> {
        (self.child_count > 0 && self.child_index != self.child_count).then(|| Progress {
            label: "Side quest questions",
            current: self.child_index,
            max: self.child_count,
        })
    }
}

/// A labelled progress value for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub label: &'static str,
    pub current: u32,
    pub max: u32,
}

impl Progress {
    /// Completion percentage, clamped to 0..=100
    pub fn percentage(&self) -> u32 {
        if self.max == 0 {
            return 0;
        }
        let pct = u64::from(self.current) * 100 / u64::from(self.max);
        u32::try_from(pct.min(100)).unwrap_or(100)
    }
}

/// Classification of a `getQuestion` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorAdvance {
    /// A question to show
    Question {
        text: String,
        position: CursorPosition,
    },
    /// No further questions; the session is over
    Exhausted {
        summary: String,
        position: CursorPosition,
    },
}

/// How a question made it into the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionRender {
    Appended(usize),
    Replayed(usize),
}

impl QuestionRender {
    pub fn index(self) -> usize {
        match self {
            QuestionRender::Appended(i) | QuestionRender::Replayed(i) => i,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionCursor {
    position: CursorPosition,
    current_question: Option<String>,
}

impl QuestionCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> CursorPosition {
        self.position
    }

    #[cfg(test)]
    pub fn current_question(&self) -> Option<&str> {
        self.current_question.as_deref()
    }

    /// Classify a response. An absent or blank question ends the session.
    pub fn classify(response: QuestionResponse) -> CursorAdvance {
        let position = CursorPosition::from_response(&response);
        match response.question {
            Some(text) if !text.trim().is_empty() => CursorAdvance::Question { text, position },
            _ => CursorAdvance::Exhausted {
                summary: response
                    .chat_evaluation
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
                position,
            },
        }
    }

    /// Put a question on screen and move the cursor to `position`.
    ///
    /// A question identical to the one already shown is replayed so it
    /// reappears after any interleaved feedback; anything else is appended.
    pub fn show_question(
        &mut self,
        log: &mut MessageLog,
        text: &str,
        position: CursorPosition,
    ) -> QuestionRender {
        let replayed = if self.current_question.as_deref() == Some(text) {
            log.replay_last_bot(text)
        } else {
            None
        };

        let render = match replayed {
            Some(index) => QuestionRender::Replayed(index),
            None => QuestionRender::Appended(log.append(ChatEntry::bot(text))),
        };

        self.current_question = Some(text.to_string());
        self.position = position;
        render
    }

    /// Show the current question again (re-ask after reference text)
    pub fn replay_current(&self, log: &mut MessageLog) -> Option<usize> {
        let question = self.current_question.as_deref()?;
        log.replay_last_bot(question)
            .or_else(|| Some(log.append(ChatEntry::bot(question))))
    }

    /// Record the final position once the question stream is exhausted
    pub fn finish(&mut self, position: CursorPosition) {
        self.current_question = None;
        self.position = position;
    }
}
