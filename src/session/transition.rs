//! State transition function
//!
//! The transition mutates only the in-memory session model and performs no
//! I/O: every request to the Question Service and every UI notification is
//! returned as an [`Effect`] for the controller to execute. A rejected event
//! leaves the model untouched.

use super::cursor::{CursorAdvance, QuestionCursor};
use super::effect::UiEvent;
use super::log::ChatEntry;
use super::reconcile::FeedbackDisposition;
use super::state::{HintState, SessionContext, SessionModel, SessionOutcome, SessionState};
use super::{Effect, Event};
use crate::service::{Operation, ServiceErrorKind};
use thiserror::Error;

/// Notice shown when the service gives up on the current question
pub const MOVING_ON_TEXT: &str = "Moving on to the next question.";
pub const SUBMIT_ERROR_TEXT: &str = "Error submitting answer.";
pub const FETCH_ERROR_TEXT: &str = "Error loading the next question.";
pub const AWARD_ERROR_TEXT: &str = "Error awarding completion points.";
pub const SESSION_EXPIRED_TEXT: &str = "Session expired. Sign in again to continue.";

/// Result of a state transition
#[derive(Debug, Default)]
pub struct TransitionResult {
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Service requests among the effects
    pub fn requests(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(|e| e.is_request())
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Input is disabled until the current request resolves")]
    InputDisabled,
    #[error("Answer is empty")]
    EmptyAnswer,
    #[error("There is no question to answer")]
    NoActiveQuestion,
    #[error("No hint is available for this question")]
    NoHintAvailable,
    #[error("The hint for this question was already revealed")]
    HintAlreadyRevealed,
    #[error("A session is already in progress")]
    SessionInProgress,
    #[error("Nothing to retry")]
    NothingToRetry,
    #[error("Quit in progress")]
    QuitInProgress,
    #[error("Session is closed")]
    SessionClosed,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Accumulates model changes and the effects that announce them, in order
struct Step<'a> {
    model: &'a mut SessionModel,
    effects: Vec<Effect>,
}

impl<'a> Step<'a> {
    fn new(model: &'a mut SessionModel) -> Self {
        Self {
            model,
            effects: Vec::new(),
        }
    }

    fn append(&mut self, entry: ChatEntry) {
        let index = self.model.log.append(entry.clone());
        self.effects.push(Effect::entry_appended(index, entry));
    }

    /// Announce an entry that was added to the log by a component
    fn announce(&mut self, index: usize) {
        if let Some(entry) = self.model.log.get(index) {
            self.effects.push(Effect::entry_appended(index, entry.clone()));
        }
    }

    fn feedback(&mut self, text: &str) -> FeedbackDisposition {
        let disposition = self.model.feedback.reconcile(&mut self.model.log, text);
        if let Some(index) = disposition.index() {
            self.announce(index);
        }
        disposition
    }

    fn notify(&mut self, event: UiEvent) {
        self.effects.push(Effect::Notify(event));
    }

    fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    fn enter(&mut self, state: SessionState) {
        self.model.state = state;
        self.effects.push(Effect::state_changed(
            &self.model.state,
            self.model.input_disabled(),
            self.model.hint_available(),
        ));
    }

    fn finish(self) -> TransitionResult {
        TransitionResult::new().with_effects(self.effects)
    }
}

/// Error notice for a failed request
fn failure_notice(kind: ServiceErrorKind, message: String) -> String {
    match kind {
        ServiceErrorKind::Auth => format!("{SESSION_EXPIRED_TEXT} ({message})"),
        _ => message,
    }
}

/// Apply one event to the session model
#[allow(clippy::too_many_lines)]
pub fn transition(
    model: &mut SessionModel,
    _context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    // Results requested before the last restart belong to a discarded session
    if model.is_stale(&event) {
        return Ok(TransitionResult::new());
    }

    let state = model.state.clone();
    match (state, event) {
        // ============================================================
        // Session start
        // ============================================================
        (state, Event::Start) if state.can_start() => {
            model.restart();
            let mut step = Step::new(model);
            step.enter(SessionState::Loading);
            step.emit(Effect::FetchQuestion);
            Ok(step.finish())
        }

        (SessionState::Quitting, Event::Start) => Err(TransitionError::QuitInProgress),
        (_, Event::Start) => Err(TransitionError::SessionInProgress),

        // ============================================================
        // Answer submission
        // ============================================================
        (
            SessionState::Active { question } | SessionState::HintRevealed { question, .. },
            Event::SubmitAnswer { text },
        ) => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyAnswer);
            }
            let hint = std::mem::take(&mut model.hint);
            let mut step = Step::new(model);
            step.append(ChatEntry::user(text.clone()));
            step.enter(SessionState::Evaluating {
                question: question.clone(),
                hint,
            });
            step.emit(Effect::SubmitAnswer {
                answer: text,
                question,
            });
            Ok(step.finish())
        }

        (SessionState::Quitting, Event::SubmitAnswer { .. } | Event::RequestHint) => {
            Err(TransitionError::QuitInProgress)
        }
        (state, Event::SubmitAnswer { .. } | Event::RequestHint) if state.is_busy() => {
            Err(TransitionError::InputDisabled)
        }
        (SessionState::Closed, Event::SubmitAnswer { .. } | Event::RequestHint) => {
            Err(TransitionError::SessionClosed)
        }
        (_, Event::SubmitAnswer { .. }) => Err(TransitionError::NoActiveQuestion),

        // ============================================================
        // Hints
        // ============================================================
        (SessionState::Active { question }, Event::RequestHint) => {
            let HintState::Offered(reference) = model.hint.clone() else {
                return Err(TransitionError::NoHintAvailable);
            };
            model.hint = HintState::Revealed(reference.clone());
            let mut step = Step::new(model);
            step.append(ChatEntry::bot(reference.clone()));
            step.notify(UiEvent::HintRevealed {
                reference: reference.clone(),
            });
            step.enter(SessionState::HintRevealed {
                question,
                reference,
            });
            Ok(step.finish())
        }

        (SessionState::HintRevealed { .. }, Event::RequestHint) => {
            Err(TransitionError::HintAlreadyRevealed)
        }
        (_, Event::RequestHint) => Err(TransitionError::NoActiveQuestion),

        // ============================================================
        // Answer evaluation
        // Log order: feedback, notice, then re-asked question or next fetch
        // ============================================================
        (SessionState::Evaluating { question, .. }, Event::AnswerEvaluated { response, .. }) => {
            let mut step = Step::new(model);
            step.feedback(&response.feedback);

            let score = step.model.score.record(response.score.into());
            step.notify(UiEvent::ScoreChanged { score });

            if response.improperly_answered {
                step.append(ChatEntry::bot(MOVING_ON_TEXT));
            }

            // Reference text means the same question is asked again
            match response.text.filter(|t| !t.trim().is_empty()) {
                Some(reference) => {
                    step.model.hint = HintState::Offered(reference);
                    let index = match step.model.cursor.replay_current(&mut step.model.log) {
                        Some(index) => index,
                        None => step.model.log.append(ChatEntry::bot(question.clone())),
                    };
                    step.announce(index);
                    step.enter(SessionState::Active { question });
                }
                None if response.improperly_answered => {
                    step.enter(SessionState::Advancing);
                    step.emit(Effect::FetchQuestion);
                }
                None => {
                    step.enter(SessionState::Loading);
                    step.emit(Effect::FetchQuestion);
                }
            }
            Ok(step.finish())
        }

        // ============================================================
        // Question received
        // ============================================================
        (
            SessionState::Loading | SessionState::Advancing,
            Event::QuestionReceived { response, .. },
        ) => {
            let mut step = Step::new(model);
            step.model.hint = HintState::Unavailable;

            match QuestionCursor::classify(response) {
                CursorAdvance::Question { text, position } => {
                    let render =
                        step.model
                            .cursor
                            .show_question(&mut step.model.log, &text, position);
                    step.announce(render.index());
                    step.emit(Effect::progress(position));
                    step.enter(SessionState::Active { question: text });
                }
                CursorAdvance::Exhausted { summary, position } => {
                    step.model.cursor.finish(position);
                    step.feedback(&summary);
                    step.emit(Effect::progress(position));
                    let score = step.model.score.total();
                    step.enter(SessionState::Completing { summary });
                    step.emit(Effect::AwardCompletion { score });
                }
            }
            Ok(step.finish())
        }

        // ============================================================
        // Completion
        // ============================================================
        (SessionState::Completing { summary }, Event::CompletionAwarded { response, .. }) => {
            let outcome = SessionOutcome {
                summary_text: summary,
                points_earned: response.points_earned,
            };
            let mut step = Step::new(model);
            step.enter(SessionState::Completed {
                outcome: outcome.clone(),
            });
            step.notify(UiEvent::Completed { outcome });
            Ok(step.finish())
        }

        // ============================================================
        // Service failures: show an error, do not advance
        // ============================================================
        (
            SessionState::Evaluating { question, hint },
            Event::RequestFailed {
                operation: Operation::SubmitAnswer,
                kind,
                message,
                ..
            },
        ) => {
            model.hint = hint.clone();
            let restored = match hint {
                HintState::Revealed(reference) => SessionState::HintRevealed {
                    question,
                    reference,
                },
                HintState::Offered(_) | HintState::Unavailable => {
                    SessionState::Active { question }
                }
            };
            let mut step = Step::new(model);
            step.feedback(SUBMIT_ERROR_TEXT);
            step.emit(Effect::error(failure_notice(kind, message)));
            step.enter(restored);
            Ok(step.finish())
        }

        (
            SessionState::Loading | SessionState::Advancing,
            Event::RequestFailed {
                operation: Operation::GetQuestion,
                kind,
                message,
                ..
            },
        ) => {
            let message = failure_notice(kind, message);
            let mut step = Step::new(model);
            step.feedback(FETCH_ERROR_TEXT);
            step.emit(Effect::error(message.clone()));
            step.enter(SessionState::Stalled { message });
            Ok(step.finish())
        }

        (
            SessionState::Completing { summary },
            Event::RequestFailed {
                operation: Operation::AwardCompletion,
                kind,
                message,
                ..
            },
        ) => {
            let message = failure_notice(kind, message);
            let mut step = Step::new(model);
            step.feedback(AWARD_ERROR_TEXT);
            step.emit(Effect::error(message.clone()));
            step.enter(SessionState::CompletionFailed { summary, message });
            Ok(step.finish())
        }

        // ============================================================
        // Retry (user-initiated only)
        // ============================================================
        (SessionState::Stalled { .. }, Event::Retry) => {
            let mut step = Step::new(model);
            step.enter(SessionState::Loading);
            step.emit(Effect::FetchQuestion);
            Ok(step.finish())
        }

        (SessionState::CompletionFailed { summary, .. }, Event::Retry) => {
            let mut step = Step::new(model);
            let score = step.model.score.total();
            step.enter(SessionState::Completing { summary });
            step.emit(Effect::AwardCompletion { score });
            Ok(step.finish())
        }

        (SessionState::Quitting, Event::Retry) => Err(TransitionError::QuitInProgress),
        (_, Event::Retry) => Err(TransitionError::NothingToRetry),

        // ============================================================
        // Quit: one best-effort request, then discard everything
        // ============================================================
        (SessionState::Quitting, Event::Quit) => Err(TransitionError::QuitInProgress),
        (SessionState::Closed, Event::Quit) => Err(TransitionError::SessionClosed),

        (_, Event::Quit) => {
            let mut step = Step::new(model);
            step.enter(SessionState::Quitting);
            step.emit(Effect::QuitQuiz);
            Ok(step.finish())
        }

        (
            SessionState::Quitting,
            Event::QuitAcknowledged { .. }
            | Event::RequestFailed {
                operation: Operation::QuitQuiz,
                ..
            },
        ) => {
            model.reset(SessionState::Closed);
            let mut step = Step::new(model);
            step.enter(SessionState::Closed);
            step.notify(UiEvent::SessionClosed);
            Ok(step.finish())
        }

        // Quit never cancels a request; its result is simply dropped
        (SessionState::Quitting | SessionState::Closed, event) if event.is_service_result() => {
            Ok(TransitionResult::new())
        }

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {} with event {:?}",
            state.label(),
            event
        ))),
    }
}
