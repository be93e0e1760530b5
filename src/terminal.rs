//! Line-oriented terminal front end
//!
//! Maps stdin lines to session events and renders UI notifications as text.
//! Service text is rich text (HTML); it is reduced to plain lines here.

use crate::session::{CursorPosition, Event, Progress, Sender, UiEvent};
use regex::Regex;

/// Parse one input line. Blank lines are ignored.
pub fn parse_command(line: &str) -> Option<Event> {
    let line = line.trim();
    match line {
        "" => None,
        "/hint" => Some(Event::RequestHint),
        "/retry" => Some(Event::Retry),
        "/restart" => Some(Event::Start),
        "/quit" => Some(Event::Quit),
        answer => Some(Event::SubmitAnswer {
            text: answer.to_string(),
        }),
    }
}

/// Renders notifications for a plain terminal
pub struct Renderer {
    line_break: Regex,
    tag: Regex,
    blank_lines: Regex,
}

impl Renderer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            line_break: Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|tr)>")?,
            tag: Regex::new(r"<[^>]+>")?,
            blank_lines: Regex::new(r"\n{3,}")?,
        })
    }

    /// Strip markup and decode the common entities
    pub fn plain_text(&self, html: &str) -> String {
        let text = self.line_break.replace_all(html, "\n");
        let text = self.tag.replace_all(&text, "");
        let text = decode_entities(&text);
        self.blank_lines
            .replace_all(text.trim(), "\n\n")
            .into_owned()
    }

    /// Text to print for a notification, if any
    pub fn render(&self, event: &UiEvent) -> Option<String> {
        match event {
            UiEvent::EntryAppended { entry, .. } => Some(match entry.sender {
                Sender::Bot => self.plain_text(&entry.text),
                Sender::User => format!("me: {}", entry.text),
            }),
            UiEvent::Progress { position } => Some(render_progress(position)),
            UiEvent::ScoreChanged { score } => Some(format!("[score: {score}]")),
            UiEvent::HintRevealed { .. } => None,
            UiEvent::Completed { outcome } => Some(format!(
                "Quiz finished. Points earned: {}",
                outcome.points_earned
            )),
            UiEvent::Error { message } => Some(format!("! {message} (type /retry or /quit)")),
            UiEvent::Rejected { reason } => Some(format!("! {reason}")),
            UiEvent::SessionClosed => Some("Session closed.".to_string()),
            UiEvent::StateChanged { .. } => None,
        }
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn progress_bar(progress: &Progress) -> String {
    format!(
        "{} {}/{} ({}%)",
        progress.label,
        progress.current,
        progress.max,
        progress.percentage()
    )
}

fn render_progress(position: &CursorPosition) -> String {
    let mut line = progress_bar(&position.question_progress());
    if let Some(side_quest) = position.side_quest_progress() {
        line.push_str(" | ");
        line.push_str(&progress_bar(&side_quest));
    }
    line
}
