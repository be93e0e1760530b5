//! Question Service abstraction
//!
//! The quiz backend is reached only through this request/response contract.
//! Every call carries the session token explicitly.

mod error;
mod http;
mod types;

pub use error::{ServiceError, ServiceErrorKind};
pub use http::HttpQuestionService;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for Question Service backends
#[async_trait]
pub trait QuestionService: Send + Sync {
    /// Fetch the current question. An absent question signals the end of the session.
    async fn get_question(&self, token: &SessionToken) -> Result<QuestionResponse, ServiceError>;

    /// Submit an answer for evaluation. Never retried automatically.
    async fn submit_answer(
        &self,
        token: &SessionToken,
        request: &AnswerRequest,
    ) -> Result<AnswerResponse, ServiceError>;

    /// Award completion points for the final score. Never retried automatically.
    async fn award_completion(
        &self,
        token: &SessionToken,
        score: u32,
    ) -> Result<CompletionResponse, ServiceError>;

    /// Tear the session down server-side (best-effort)
    async fn quit_quiz(&self, token: &SessionToken) -> Result<(), ServiceError>;

    /// Human-readable backend name for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: QuestionService + ?Sized> QuestionService for Arc<T> {
    async fn get_question(&self, token: &SessionToken) -> Result<QuestionResponse, ServiceError> {
        (**self).get_question(token).await
    }

    async fn submit_answer(
        &self,
        token: &SessionToken,
        request: &AnswerRequest,
    ) -> Result<AnswerResponse, ServiceError> {
        (**self).submit_answer(token, request).await
    }

    async fn award_completion(
        &self,
        token: &SessionToken,
        score: u32,
    ) -> Result<CompletionResponse, ServiceError> {
        (**self).award_completion(token, score).await
    }

    async fn quit_quiz(&self, token: &SessionToken) -> Result<(), ServiceError> {
        (**self).quit_quiz(token).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Logging wrapper for Question Service backends
pub struct LoggingService<Q> {
    inner: Q,
    name: String,
}

impl<Q: QuestionService> LoggingService<Q> {
    pub fn new(inner: Q) -> Self {
        let name = inner.name().to_string();
        Self { inner, name }
    }

    fn log_outcome<T>(
        &self,
        operation: Operation,
        started: std::time::Instant,
        result: &Result<T, ServiceError>,
    ) {
        let duration = started.elapsed();
        match result {
            Ok(_) => {
                tracing::info!(
                    service = %self.name,
                    operation = %operation,
                    duration_ms = %duration.as_millis(),
                    "Question service request completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    service = %self.name,
                    operation = %operation,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    "Question service request failed"
                );
            }
        }
    }
}

#[async_trait]
impl<Q: QuestionService> QuestionService for LoggingService<Q> {
    async fn get_question(&self, token: &SessionToken) -> Result<QuestionResponse, ServiceError> {
        let start = std::time::Instant::now();
        let result = self.inner.get_question(token).await;
        self.log_outcome(Operation::GetQuestion, start, &result);
        if let Ok(response) = &result {
            tracing::debug!(
                has_question = response.question.is_some(),
                question_index = response.current_question_index,
                total_questions = response.total_questions,
                "getQuestion response"
            );
        }
        result
    }

    async fn submit_answer(
        &self,
        token: &SessionToken,
        request: &AnswerRequest,
    ) -> Result<AnswerResponse, ServiceError> {
        let start = std::time::Instant::now();
        let result = self.inner.submit_answer(token, request).await;
        self.log_outcome(Operation::SubmitAnswer, start, &result);
        result
    }

    async fn award_completion(
        &self,
        token: &SessionToken,
        score: u32,
    ) -> Result<CompletionResponse, ServiceError> {
        let start = std::time::Instant::now();
        let result = self.inner.award_completion(token, score).await;
        self.log_outcome(Operation::AwardCompletion, start, &result);
        result
    }

    async fn quit_quiz(&self, token: &SessionToken) -> Result<(), ServiceError> {
        let start = std::time::Instant::now();
        let result = self.inner.quit_quiz(token).await;
        self.log_outcome(Operation::QuitQuiz, start, &result);
        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}
