//! Runtime for executing quiz sessions
//!
//! The controller owns the session model and is the only place effects are
//! executed. Front ends talk to it through a [`SessionHandle`].

mod executor;

#[cfg(test)]
pub mod testing;

pub use executor::SessionController;

use crate::service::{QuestionService, SessionToken};
use crate::session::{Event, SessionContext, UiEvent};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

const EVENT_CHANNEL_CAPACITY: usize = 32;
const BROADCAST_CHANNEL_CAPACITY: usize = 128;

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub event_tx: mpsc::Sender<Event>,
    pub broadcast_tx: broadcast::Sender<UiEvent>,
}

impl SessionHandle {
    /// Subscribe to UI notifications from this point on
    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Queue a user event for the controller
    pub async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.event_tx.send(event).await
    }
}

/// Spawn a controller for a new session and return its handle.
///
/// Subscribe before sending the first event to observe every notification.
pub fn spawn_session<Q>(service: Q, token: SessionToken) -> (SessionHandle, JoinHandle<()>)
where
    Q: QuestionService + 'static,
{
    let context = SessionContext::new(token);
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (broadcast_tx, _) = broadcast::channel(BROADCAST_CHANNEL_CAPACITY);

    let controller = SessionController::new(
        context,
        service,
        event_rx,
        event_tx.clone(),
        broadcast_tx.clone(),
    );
    let join = tokio::spawn(controller.run());

    (
        SessionHandle {
            event_tx,
            broadcast_tx,
        },
        join,
    )
}
