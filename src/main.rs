//! Sidequest - terminal quiz client
//!
//! Drives a question/feedback/score session against a Question Service
//! using a pure session state machine and an async controller.

mod config;
mod runtime;
mod service;
mod session;
mod terminal;

use config::ClientConfig;
use service::{HttpQuestionService, LoggingService, SessionToken};
use session::{Event, UiEvent};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long to wait for the quit request before exiting anyway
const QUIT_GRACE: Duration = Duration::from_secs(10);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout belongs to the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sidequest=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = ClientConfig::from_env()?;
    tracing::info!(
        service_url = %config.service_url,
        timeout_secs = config.request_timeout.as_secs(),
        fetch_attempts = config.fetch_attempts,
        "Starting quiz session"
    );

    let http = HttpQuestionService::new(
        &config.service_url,
        config.request_timeout,
        config.fetch_attempts,
    )?;
    let service = LoggingService::new(http);
    let (handle, _controller) =
        runtime::spawn_session(service, SessionToken::new(config.session_token));

    // Printer: renders notifications until the session is closed
    let renderer = terminal::Renderer::new()?;
    let mut ui_rx = handle.subscribe();
    let mut printer = tokio::spawn(async move {
        loop {
            match ui_rx.recv().await {
                Ok(event) => {
                    if let Some(text) = renderer.render(&event) {
                        println!("{text}");
                    }
                    if matches!(event, UiEvent::SessionClosed) {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Terminal fell behind session notifications");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    handle.send(Event::Start).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut closed = false;
    loop {
        tokio::select! {
            _ = &mut printer => {
                closed = true;
                break;
            }
            line = lines.next_line() => match line? {
                Some(line) => {
                    if let Some(event) = terminal::parse_command(&line) {
                        handle.send(event).await?;
                    }
                }
                None => break,
            }
        }
    }

    // End of input: quit the session server-side before exiting
    if !closed {
        handle.send(Event::Quit).await?;
        if tokio::time::timeout(QUIT_GRACE, printer).await.is_err() {
            tracing::warn!("Quit did not complete in time, exiting");
        }
    }

    Ok(())
}
