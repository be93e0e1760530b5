//! Effects produced by state transitions

use super::cursor::CursorPosition;
use super::log::ChatEntry;
use super::state::{SessionOutcome, SessionState};
use serde::Serialize;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Request the next question
    FetchQuestion,

    /// Send an answer for evaluation
    SubmitAnswer { answer: String, question: String },

    /// Award completion points for the final score
    AwardCompletion { score: u32 },

    /// Tear down the session server-side
    QuitQuiz,

    /// Notify the presentation layer
    Notify(UiEvent),
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// A transcript entry was appended; scroll to the newest entry
    EntryAppended { index: usize, entry: ChatEntry },
    StateChanged {
        state: &'static str,
        input_disabled: bool,
        hint_available: bool,
    },
    Progress { position: CursorPosition },
    ScoreChanged { score: u32 },
    HintRevealed { reference: String },
    Completed { outcome: SessionOutcome },
    Error { message: String },
    /// A user action was rejected; state is unchanged
    Rejected { reason: String },
    SessionClosed,
}

impl Effect {
    pub fn entry_appended(index: usize, entry: ChatEntry) -> Self {
        Effect::Notify(UiEvent::EntryAppended { index, entry })
    }

    pub fn state_changed(state: &SessionState, input_disabled: bool, hint_available: bool) -> Self {
        Effect::Notify(UiEvent::StateChanged {
            state: state.label(),
            input_disabled,
            hint_available,
        })
    }

    pub fn progress(position: CursorPosition) -> Self {
        Effect::Notify(UiEvent::Progress { position })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Effect::Notify(UiEvent::Error {
            message: message.into(),
        })
    }

    /// Whether this effect issues a Question Service request
    pub fn is_request(&self) -> bool {
        !matches!(self, Effect::Notify(_))
    }
}
