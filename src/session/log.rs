//! Append-only session transcript

use serde::{Deserialize, Serialize};

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Bot,
    User,
}

/// One transcript entry. Append order is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub text: String,
    pub sender: Sender,
}

impl ChatEntry {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }
}

/// Ordered, append-only log of chat entries.
///
/// Entries are never mutated or removed. Re-showing something that is already
/// on screen is done with [`MessageLog::replay_last_bot`], which adds a new
/// entry rather than touching the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    entries: Vec<ChatEntry>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its index
    pub fn append(&mut self, entry: ChatEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Re-append the most recent bot entry carrying `text`.
    ///
    /// Returns the index of the new entry, or `None` if no bot entry with that
    /// text has been shown yet (nothing to replay).
    pub fn replay_last_bot(&mut self, text: &str) -> Option<usize> {
        let replayed = self
            .entries
            .iter()
            .rev()
            .find(|e| e.sender == Sender::Bot && e.text == text)?
            .clone();
        Some(self.append(replayed))
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ChatEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
