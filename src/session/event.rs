//! Events that can occur in a session

use crate::service::{
    AnswerResponse, CompletionResponse, Operation, QuestionResponse, ServiceError,
    ServiceErrorKind,
};

/// Events that trigger state transitions
///
/// Service results carry the generation of the session that issued the
/// request, so results outliving a quit are never applied to a restart.
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    /// Begin a session (first question request)
    Start,
    SubmitAnswer {
        text: String,
    },
    RequestHint,
    /// Re-issue the step that last failed
    Retry,
    Quit,

    // Question Service results
    QuestionReceived {
        generation: u64,
        response: QuestionResponse,
    },
    AnswerEvaluated {
        generation: u64,
        response: AnswerResponse,
    },
    CompletionAwarded {
        generation: u64,
        response: CompletionResponse,
    },
    QuitAcknowledged {
        generation: u64,
    },
    RequestFailed {
        generation: u64,
        operation: Operation,
        kind: ServiceErrorKind,
        message: String,
    },
}

impl Event {
    pub fn request_failed(generation: u64, operation: Operation, error: ServiceError) -> Self {
        Event::RequestFailed {
            generation,
            operation,
            kind: error.kind,
            message: error.message,
        }
    }

    /// Session generation of a service result; `None` for user events
    pub fn generation(&self) -> Option<u64> {
        match self {
            Event::QuestionReceived { generation, .. }
            | Event::AnswerEvaluated { generation, .. }
            | Event::CompletionAwarded { generation, .. }
            | Event::QuitAcknowledged { generation }
            | Event::RequestFailed { generation, .. } => Some(*generation),
            Event::Start
            | Event::SubmitAnswer { .. }
            | Event::RequestHint
            | Event::Retry
            | Event::Quit => None,
        }
    }

    /// Whether this event comes from a service call rather than the user
    pub fn is_service_result(&self) -> bool {
        self.generation().is_some()
    }
}
