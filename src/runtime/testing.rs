//! Mock implementations for testing
//!
//! These mocks enable integration testing of the controller without real I/O.

use crate::runtime::{spawn_session, SessionHandle};
use crate::service::{
    AnswerRequest, AnswerResponse, AnswerScore, CompletionResponse, QuestionResponse,
    QuestionService, ServiceError, SessionToken,
};
use crate::session::{Event, UiEvent};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

// ============================================================================
// Mock Question Service
// ============================================================================

/// A recorded call against the mock service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GetQuestion,
    SubmitAnswer(AnswerRequest),
    AwardCompletion(u32),
    QuitQuiz,
}

/// Mock Question Service that returns queued responses per operation
#[allow(dead_code)]
pub struct MockQuestionService {
    questions: Mutex<VecDeque<Result<QuestionResponse, ServiceError>>>,
    answers: Mutex<VecDeque<Result<AnswerResponse, ServiceError>>>,
    completions: Mutex<VecDeque<Result<CompletionResponse, ServiceError>>>,
    quits: Mutex<VecDeque<Result<(), ServiceError>>>,
    /// Applied before every response
    delay: Option<Duration>,
    /// Record of all calls made
    pub calls: Mutex<Vec<MockCall>>,
}

#[allow(dead_code)]
impl MockQuestionService {
    pub fn new() -> Self {
        Self {
            questions: Mutex::new(VecDeque::new()),
            answers: Mutex::new(VecDeque::new()),
            completions: Mutex::new(VecDeque::new()),
            quits: Mutex::new(VecDeque::new()),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Respond only after `delay`, keeping requests in flight
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_question(&self, text: &str, index: u32, total: u32) {
        self.questions.lock().unwrap().push_back(Ok(QuestionResponse {
            question: Some(text.to_string()),
            chat_evaluation: None,
            current_question_index: index,
            total_questions: total,
            current_child_index: 0,
            child_count: 0,
        }));
    }

    /// Queue the end of the question stream
    pub fn queue_exhausted(&self, summary: Option<&str>, total: u32) {
        self.questions.lock().unwrap().push_back(Ok(QuestionResponse {
            question: None,
            chat_evaluation: summary.map(String::from),
            current_question_index: total,
            total_questions: total,
            current_child_index: 0,
            child_count: 0,
        }));
    }

    pub fn queue_question_error(&self, error: ServiceError) {
        self.questions.lock().unwrap().push_back(Err(error));
    }

    pub fn queue_answer(&self, response: AnswerResponse) {
        self.answers.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_answer_error(&self, error: ServiceError) {
        self.answers.lock().unwrap().push_back(Err(error));
    }

    pub fn queue_completion(&self, points_earned: u32) {
        self.completions
            .lock()
            .unwrap()
            .push_back(Ok(CompletionResponse { points_earned }));
    }

    pub fn queue_completion_error(&self, error: ServiceError) {
        self.completions.lock().unwrap().push_back(Err(error));
    }

    /// Quit succeeds unless an error is queued
    pub fn queue_quit_error(&self, error: ServiceError) {
        self.quits.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded calls
    pub fn recorded_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond<T>(
        &self,
        call: MockCall,
        queue: &Mutex<VecDeque<Result<T, ServiceError>>>,
    ) -> Result<T, ServiceError> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::network("No mock response queued")))
    }
}

impl Default for MockQuestionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionService for MockQuestionService {
    async fn get_question(&self, _token: &SessionToken) -> Result<QuestionResponse, ServiceError> {
        self.respond(MockCall::GetQuestion, &self.questions).await
    }

    async fn submit_answer(
        &self,
        _token: &SessionToken,
        request: &AnswerRequest,
    ) -> Result<AnswerResponse, ServiceError> {
        self.respond(MockCall::SubmitAnswer(request.clone()), &self.answers)
            .await
    }

    async fn award_completion(
        &self,
        _token: &SessionToken,
        score: u32,
    ) -> Result<CompletionResponse, ServiceError> {
        self.respond(MockCall::AwardCompletion(score), &self.completions)
            .await
    }

    async fn quit_quiz(&self, _token: &SessionToken) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(MockCall::QuitQuiz);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.quits.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Answer response helper
pub fn answer_response(feedback: &str, score: AnswerScore) -> AnswerResponse {
    AnswerResponse {
        feedback: feedback.to_string(),
        score,
        improperly_answered: false,
        text: None,
    }
}

// ============================================================================
// Test Session
// ============================================================================

/// Helper for driving a controller with minimal boilerplate
pub struct TestSession {
    pub handle: SessionHandle,
    pub broadcast_rx: broadcast::Receiver<UiEvent>,
    pub service: Arc<MockQuestionService>,
    /// Every notification observed so far
    pub seen: Vec<UiEvent>,
    _controller: tokio::task::JoinHandle<()>,
}

impl TestSession {
    pub fn new(service: MockQuestionService) -> Self {
        let service = Arc::new(service);
        let (handle, controller) =
            spawn_session(service.clone(), SessionToken::new("test-token"));
        let broadcast_rx = handle.subscribe();
        Self {
            handle,
            broadcast_rx,
            service,
            seen: Vec::new(),
            _controller: controller,
        }
    }

    pub async fn send(&self, event: Event) {
        self.handle.send(event).await.expect("Failed to send event");
    }

    pub async fn submit(&self, text: &str) {
        self.send(Event::SubmitAnswer {
            text: text.to_string(),
        })
        .await;
    }

    /// Wait for a notification matching `predicate`
    pub async fn wait_for(
        &mut self,
        timeout: Duration,
        predicate: impl Fn(&UiEvent) -> bool,
    ) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.broadcast_rx.recv()).await {
                Ok(Ok(event)) => {
                    let matched = predicate(&event);
                    self.seen.push(event);
                    if matched {
                        return true;
                    }
                }
                _ => continue,
            }
        }
        false
    }

    /// Wait for a specific state label with timeout
    pub async fn wait_for_state(&mut self, expected: &str, timeout: Duration) -> bool {
        self.wait_for(timeout, |event| {
            matches!(event, UiEvent::StateChanged { state, .. } if *state == expected)
        })
        .await
    }

    /// Bot and user texts appended so far, in order
    pub fn transcript(&self) -> Vec<String> {
        self.seen
            .iter()
            .filter_map(|event| match event {
                UiEvent::EntryAppended { entry, .. } => Some(entry.text.clone()),
                _ => None,
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::transition::SUBMIT_ERROR_TEXT;
    use crate::session::state::SessionOutcome;

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_mock_service_queues() {
        let mock = MockQuestionService::new();
        mock.queue_question("Q1", 0, 1);
        let token = SessionToken::new("t");

        let response = mock.get_question(&token).await.unwrap();
        assert_eq!(response.question.as_deref(), Some("Q1"));

        // Second call should fail (no more responses)
        assert!(mock.get_question(&token).await.is_err());
        // Quit defaults to success
        assert!(mock.quit_quiz(&token).await.is_ok());

        assert_eq!(
            mock.recorded_calls(),
            vec![MockCall::GetQuestion, MockCall::GetQuestion, MockCall::QuitQuiz]
        );
    }

    /// Integration test: full two-question session
    #[tokio::test]
    async fn test_complete_session() {
        let mock = MockQuestionService::new();
        mock.queue_question("Question 1", 0, 2);
        mock.queue_answer(answer_response("Correct", AnswerScore::Correct));
        mock.queue_question("Question 2", 1, 2);
        mock.queue_answer(answer_response("Perfect", AnswerScore::Perfect));
        mock.queue_exhausted(Some("Great job!"), 2);
        mock.queue_completion(60);

        let mut session = TestSession::new(mock);
        session.send(Event::Start).await;
        assert!(session.wait_for_state("active", WAIT).await);

        session.submit("my answer").await;
        assert!(session.wait_for_state("active", WAIT).await);

        session.submit("another answer").await;
        assert!(session.wait_for_state("completed", WAIT).await);

        let expected = SessionOutcome {
            summary_text: "Great job!".to_string(),
            points_earned: 60,
        };
        assert!(
            session
                .wait_for(WAIT, |e| matches!(e, UiEvent::Completed { outcome } if *outcome == expected))
                .await
        );

        let awards: Vec<_> = session
            .service
            .recorded_calls()
            .into_iter()
            .filter(|c| matches!(c, MockCall::AwardCompletion(_)))
            .collect();
        assert_eq!(awards, vec![MockCall::AwardCompletion(3)]);

        assert_eq!(
            session.transcript(),
            vec![
                "Question 1",
                "my answer",
                "Correct",
                "Question 2",
                "another answer",
                "Perfect",
                "Great job!",
            ]
        );
    }

    /// Integration test: a second submit while one is in flight is rejected
    #[tokio::test]
    async fn test_submit_rejected_while_evaluating() {
        let mock = MockQuestionService::new().with_delay(Duration::from_millis(100));
        mock.queue_question("Q1", 0, 2);
        mock.queue_answer(answer_response("Correct", AnswerScore::Correct));
        mock.queue_question("Q2", 1, 2);

        let mut session = TestSession::new(mock);
        session.send(Event::Start).await;
        assert!(session.wait_for_state("active", WAIT).await);

        session.submit("first").await;
        session.submit("second").await;
        assert!(
            session
                .wait_for(WAIT, |e| matches!(e, UiEvent::Rejected { .. }))
                .await
        );
        assert!(session.wait_for_state("active", WAIT).await);

        let submits: Vec<_> = session
            .service
            .recorded_calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::SubmitAnswer(request) => Some(request.answer),
                _ => None,
            })
            .collect();
        assert_eq!(submits, vec!["first".to_string()]);
    }

    /// Integration test: failed submission keeps the question answerable
    #[tokio::test]
    async fn test_submit_failure_restores_question() {
        let mock = MockQuestionService::new();
        mock.queue_question("Q1", 0, 1);
        mock.queue_answer_error(ServiceError::server_error("HTTP 500: boom"));

        let mut session = TestSession::new(mock);
        session.send(Event::Start).await;
        assert!(session.wait_for_state("active", WAIT).await);

        session.submit("a1").await;
        assert!(
            session
                .wait_for(WAIT, |e| matches!(e, UiEvent::Error { .. }))
                .await
        );
        assert!(session.wait_for_state("active", WAIT).await);
        assert_eq!(
            session.transcript().last().map(String::as_str),
            Some(SUBMIT_ERROR_TEXT)
        );
    }

    /// Integration test: fetch failure stalls until the user retries
    #[tokio::test]
    async fn test_fetch_failure_then_retry() {
        let mock = MockQuestionService::new();
        mock.queue_question_error(ServiceError::network("connection refused"));
        mock.queue_question("Q1", 0, 1);

        let mut session = TestSession::new(mock);
        session.send(Event::Start).await;
        assert!(session.wait_for_state("stalled", WAIT).await);

        session.send(Event::Retry).await;
        assert!(session.wait_for_state("active", WAIT).await);
        assert_eq!(session.service.recorded_calls().len(), 2);
    }

    /// Integration test: quit tears down even when the service call fails
    #[tokio::test]
    async fn test_quit_failure_still_closes() {
        let mock = MockQuestionService::new();
        mock.queue_question("Q1", 0, 1);
        mock.queue_quit_error(ServiceError::network("unreachable"));

        let mut session = TestSession::new(mock);
        session.send(Event::Start).await;
        assert!(session.wait_for_state("active", WAIT).await);

        session.send(Event::Quit).await;
        assert!(
            session
                .wait_for(WAIT, |e| matches!(e, UiEvent::SessionClosed))
                .await
        );
        assert_eq!(
            session.service.recorded_calls().last(),
            Some(&MockCall::QuitQuiz)
        );
    }
}
