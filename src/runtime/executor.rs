//! Session controller executor

use crate::service::{AnswerRequest, Operation, QuestionService, ServiceError, SessionToken};
use crate::session::{transition, Effect, Event, SessionContext, SessionModel, UiEvent};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Drives one session: applies events, executes effects, publishes notifications
pub struct SessionController<Q>
where
    Q: QuestionService + 'static,
{
    context: SessionContext,
    model: SessionModel,
    service: Arc<Q>,
    event_rx: mpsc::Receiver<Event>,
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<UiEvent>,
}

impl<Q> SessionController<Q>
where
    Q: QuestionService + 'static,
{
    pub fn new(
        context: SessionContext,
        service: Q,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        broadcast_tx: broadcast::Sender<UiEvent>,
    ) -> Self {
        Self {
            context,
            model: SessionModel::new(),
            service: Arc::new(service),
            event_rx,
            event_tx,
            broadcast_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            session_id = %self.context.session_id,
            service = %self.service.name(),
            "Starting session controller"
        );

        // Process events in a loop; service results arrive on the same channel
        loop {
            tokio::select! {
                Some(event) = self.event_rx.recv() => self.process_event(event),
                else => break,
            }
        }

        tracing::info!(session_id = %self.context.session_id, "Session controller stopped");
    }

    fn process_event(&mut self, event: Event) {
        if self.model.is_stale(&event) {
            tracing::debug!(
                session_id = %self.context.session_id,
                generation = self.model.generation,
                result_generation = ?event.generation(),
                "Dropping result from an earlier session"
            );
        }

        if let Event::RequestFailed {
            operation: Operation::QuitQuiz,
            message,
            ..
        } = &event
        {
            tracing::warn!(
                session_id = %self.context.session_id,
                error = %message,
                "Quit request failed, discarding local session anyway"
            );
        }

        let from = self.model.state.label();
        let result = match transition(&mut self.model, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                // Rejections are user-facing ("input is disabled") and change nothing
                tracing::debug!(
                    session_id = %self.context.session_id,
                    state = from,
                    error = %e,
                    "Event rejected"
                );
                let _ = self.broadcast_tx.send(UiEvent::Rejected {
                    reason: e.to_string(),
                });
                return;
            }
        };

        let to = self.model.state.label();
        if from != to {
            let position = self.model.cursor.position();
            tracing::info!(
                session_id = %self.context.session_id,
                from,
                to,
                question_index = position.question_index,
                total_questions = position.total_questions,
                score = self.model.score.total(),
                entries = self.model.log.len(),
                requests = result.requests().count(),
                "Session state changed"
            );
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::Notify(event) => {
                // No subscribers is fine; the front end may not be attached yet
                let _ = self.broadcast_tx.send(event);
            }

            Effect::FetchQuestion => {
                self.spawn_request(Operation::GetQuestion, |service, token, generation| async move {
                    service
                        .get_question(&token)
                        .await
                        .map(|response| Event::QuestionReceived {
                            generation,
                            response,
                        })
                });
            }

            Effect::SubmitAnswer { answer, question } => {
                let request = AnswerRequest {
                    answer,
                    question: Some(question),
                };
                self.spawn_request(
                    Operation::SubmitAnswer,
                    move |service, token, generation| async move {
                        service
                            .submit_answer(&token, &request)
                            .await
                            .map(|response| Event::AnswerEvaluated {
                                generation,
                                response,
                            })
                    },
                );
            }

            Effect::AwardCompletion { score } => {
                self.spawn_request(
                    Operation::AwardCompletion,
                    move |service, token, generation| async move {
                        service
                            .award_completion(&token, score)
                            .await
                            .map(|response| Event::CompletionAwarded {
                                generation,
                                response,
                            })
                    },
                );
            }

            Effect::QuitQuiz => {
                self.spawn_request(Operation::QuitQuiz, |service, token, generation| async move {
                    service
                        .quit_quiz(&token)
                        .await
                        .map(|()| Event::QuitAcknowledged { generation })
                });
            }
        }
    }

    /// Run a service call in the background and feed its result back as an
    /// event stamped with the current session generation
    fn spawn_request<F, Fut>(&self, operation: Operation, call: F)
    where
        F: FnOnce(Arc<Q>, SessionToken, u64) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Event, ServiceError>> + Send + 'static,
    {
        let service = self.service.clone();
        let token = self.context.token.clone();
        let event_tx = self.event_tx.clone();
        let session_id = self.context.session_id.clone();
        let generation = self.model.generation;

        tokio::spawn(async move {
            tracing::debug!(
                session_id = %session_id,
                operation = %operation,
                "Issuing question service request (background)"
            );

            let event = match call(service, token, generation).await {
                Ok(event) => event,
                Err(e) => Event::request_failed(generation, operation, e),
            };

            if event_tx.send(event).await.is_err() {
                tracing::debug!(
                    session_id = %session_id,
                    operation = %operation,
                    "Controller stopped before request completed"
                );
            }
        });
    }
}
