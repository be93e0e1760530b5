//! Session state types

use super::cursor::QuestionCursor;
use super::event::Event;
use super::log::MessageLog;
use super::reconcile::FeedbackReconciler;
use super::score::ScoreAccumulator;
use crate::service::SessionToken;
use serde::{Deserialize, Serialize};

// ============================================================================
// Session State
// ============================================================================

/// Terminal payload of a finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Rich text (HTML) summary from the service
    pub summary_text: String,
    pub points_earned: u32,
}

/// Reference text availability for the current question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "reference", rename_all = "snake_case")]
pub enum HintState {
    #[default]
    Unavailable,
    /// Reference text can be revealed on request
    Offered(String),
    /// Reference text was shown; no further hint until the next question
    Revealed(String),
}

/// Session state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    /// No session started yet
    #[default]
    Idle,

    /// `getQuestion` in flight
    Loading,

    /// Question on screen, waiting for an answer
    Active { question: String },

    /// `submitAnswer` in flight
    Evaluating {
        question: String,
        /// Hint state to restore if the submission fails
        hint: HintState,
    },

    /// Reference text disclosed; answers are still accepted
    HintRevealed { question: String, reference: String },

    /// Question was improperly answered; fetching the next one
    Advancing,

    /// Question stream exhausted, `awardCompletion` in flight
    Completing { summary: String },

    /// `awardCompletion` failed; completion is still pending
    CompletionFailed { summary: String, message: String },

    /// `getQuestion` failed; waiting for retry or quit
    Stalled { message: String },

    /// Session finished
    Completed { outcome: SessionOutcome },

    /// `quitQuiz` in flight
    Quitting,

    /// Local state discarded after quit
    Closed,
}

impl SessionState {
    /// Short label for logs and UI notifications
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Loading => "loading",
            SessionState::Active { .. } => "active",
            SessionState::Evaluating { .. } => "evaluating",
            SessionState::HintRevealed { .. } => "hint_revealed",
            SessionState::Advancing => "advancing",
            SessionState::Completing { .. } => "completing",
            SessionState::CompletionFailed { .. } => "completion_failed",
            SessionState::Stalled { .. } => "stalled",
            SessionState::Completed { .. } => "completed",
            SessionState::Quitting => "quitting",
            SessionState::Closed => "closed",
        }
    }

    /// A request is outstanding; user input must wait
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SessionState::Loading
                | SessionState::Evaluating { .. }
                | SessionState::Advancing
                | SessionState::Completing { .. }
                | SessionState::Quitting
        )
    }

    /// A new session may be started from here
    pub fn can_start(&self) -> bool {
        matches!(
            self,
            SessionState::Idle | SessionState::Completed { .. } | SessionState::Closed
        )
    }
}

// ============================================================================
// Session Model
// ============================================================================

/// Everything the controller owns for one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionModel {
    pub state: SessionState,
    pub log: MessageLog,
    pub feedback: FeedbackReconciler,
    pub cursor: QuestionCursor,
    pub score: ScoreAccumulator,
    pub hint: HintState,
    /// Bumped on every start; service results from other generations are stale
    pub generation: u64,
}

impl SessionModel {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            log: MessageLog::new(),
            feedback: FeedbackReconciler::new(),
            cursor: QuestionCursor::new(),
            score: ScoreAccumulator::new(),
            hint: HintState::Unavailable,
            generation: 0,
        }
    }

    /// Drop all local session data and enter `state`
    pub fn reset(&mut self, state: SessionState) {
        *self = Self {
            state,
            generation: self.generation,
            ..Self::new()
        };
    }

    /// Discard everything and start a new generation
    pub fn restart(&mut self) {
        self.reset(SessionState::Idle);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Whether a service result was requested by an earlier session
    pub fn is_stale(&self, event: &Event) -> bool {
        event
            .generation()
            .is_some_and(|generation| generation != self.generation)
    }

    /// Input is disabled while a request is outstanding
    pub fn input_disabled(&self) -> bool {
        self.state.is_busy()
    }

    pub fn hint_available(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
            && matches!(self.hint, HintState::Offered(_))
    }
}

// ============================================================================
// Session Context
// ============================================================================

/// Immutable identity of a session
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Local identifier used for log correlation
    pub session_id: String,
    pub token: SessionToken,
}

impl SessionContext {
    pub fn new(token: SessionToken) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            token,
        }
    }
}
