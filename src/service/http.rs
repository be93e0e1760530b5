//! HTTP/JSON Question Service implementation

use super::types::{
    AnswerRequest, AnswerResponse, CompletionRequest, CompletionResponse, ErrorBody, Operation,
    QuestionResponse, SessionToken,
};
use super::{QuestionService, ServiceError};
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Name of the cookie carrying the backend session
const SESSION_COOKIE: &str = "session";

/// Question Service reached over HTTP
pub struct HttpQuestionService {
    client: Client,
    base_url: String,
    fetch_attempts: u32,
}

impl HttpQuestionService {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        fetch_attempts: u32,
    ) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            fetch_attempts: fetch_attempts.max(1),
        })
    }

    fn endpoint(&self, operation: Operation) -> String {
        format!("{}/api/{}", self.base_url, operation.as_str())
    }

    fn with_session(request: RequestBuilder, token: &SessionToken) -> RequestBuilder {
        request.header(
            header::COOKIE,
            format!("{SESSION_COOKIE}={}", token.as_str()),
        )
    }

    /// Send a request and return the body of a successful response
    async fn send_raw(request: RequestBuilder) -> Result<String, ServiceError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::network(format!("Request timeout: {e}"))
            } else if e.is_connect() {
                ServiceError::network(format!("Connection failed: {e}"))
            } else {
                ServiceError::unknown(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        Ok(body)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ServiceError> {
        let body = Self::send_raw(request).await?;
        serde_json::from_str(&body)
            .map_err(|e| ServiceError::malformed(format!("Failed to parse response: {e}")))
    }

    async fn fetch_question_once(
        &self,
        token: &SessionToken,
    ) -> Result<QuestionResponse, ServiceError> {
        let request = self.client.get(self.endpoint(Operation::GetQuestion));
        Self::send(Self::with_session(request, token)).await
    }
}

/// Map a non-success status to an error kind, preferring the backend's `{"error": ...}` message
fn classify_error(status: StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        401 | 403 => ServiceError::auth(format!("Session rejected: {message}")),
        400 | 404 | 409 | 422 => ServiceError::invalid_request(format!("Invalid request: {message}")),
        500..=599 => ServiceError::server_error(format!("Server error: {message}")),
        _ => ServiceError::unknown(format!("HTTP {status}: {message}")),
    }
}

fn retry_delay(attempt: u32) -> Duration {
    // Exponential backoff: 500ms, 1s, 2s, ...
    Duration::from_millis(500 << (attempt.saturating_sub(1)).min(6))
}

#[async_trait]
impl QuestionService for HttpQuestionService {
    async fn get_question(&self, token: &SessionToken) -> Result<QuestionResponse, ServiceError> {
        let mut attempt = 1;
        loop {
            match self.fetch_question_once(token).await {
                Err(e) if e.kind.is_retryable() && attempt < self.fetch_attempts => {
                    let delay = retry_delay(attempt);
                    tracing::debug!(
                        attempt,
                        delay_ms = %delay.as_millis(),
                        error = %e,
                        "Retrying getQuestion"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn submit_answer(
        &self,
        token: &SessionToken,
        request: &AnswerRequest,
    ) -> Result<AnswerResponse, ServiceError> {
        let builder = self
            .client
            .post(self.endpoint(Operation::SubmitAnswer))
            .json(request);
        Self::send(Self::with_session(builder, token)).await
    }

    async fn award_completion(
        &self,
        token: &SessionToken,
        score: u32,
    ) -> Result<CompletionResponse, ServiceError> {
        let builder = self
            .client
            .post(self.endpoint(Operation::AwardCompletion))
            .json(&CompletionRequest { score });
        Self::send(Self::with_session(builder, token)).await
    }

    async fn quit_quiz(&self, token: &SessionToken) -> Result<(), ServiceError> {
        let builder = self
            .client
            .post(self.endpoint(Operation::QuitQuiz))
            .json(&serde_json::json!({}));
        // Any success status is an ack; the body is informational
        Self::send_raw(Self::with_session(builder, token))
            .await
            .map(|_| ())
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}
