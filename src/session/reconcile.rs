//! Feedback deduplication
//!
//! Identical feedback for two separate answers ("Correct!" twice in a row)
//! must still show up twice. Comparing against the last shown value cannot
//! tell "same value again" from "no update", so that decision lives here.

use super::log::{ChatEntry, MessageLog};

/// What the reconciler did with a piece of feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackDisposition {
    /// New text, appended at this index
    Appended(usize),
    /// Same text as last time, replayed at this index
    Replayed(usize),
    /// Blank feedback is not shown
    Skipped,
}

impl FeedbackDisposition {
    pub fn index(self) -> Option<usize> {
        match self {
            FeedbackDisposition::Appended(i) | FeedbackDisposition::Replayed(i) => Some(i),
            FeedbackDisposition::Skipped => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackReconciler {
    last_shown: Option<String>,
}

impl FeedbackReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn last_shown(&self) -> Option<&str> {
        self.last_shown.as_deref()
    }

    pub fn reconcile(&mut self, log: &mut MessageLog, feedback: &str) -> FeedbackDisposition {
        if feedback.trim().is_empty() {
            return FeedbackDisposition::Skipped;
        }

        if self.last_shown.as_deref() == Some(feedback) {
            if let Some(index) = log.replay_last_bot(feedback) {
                return FeedbackDisposition::Replayed(index);
            }
        }

        let index = log.append(ChatEntry::bot(feedback));
        self.last_shown = Some(feedback.to_string());
        FeedbackDisposition::Appended(index)
    }
}
