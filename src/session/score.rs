//! Running score for a session

use crate::service::AnswerScore;
use serde::{Deserialize, Serialize};

/// Credit for one evaluated answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    NoCredit,
    Correct,
    Perfect,
}

impl OutcomeKind {
    pub fn points(self) -> u32 {
        match self {
            OutcomeKind::NoCredit => 0,
            OutcomeKind::Correct => 1,
            OutcomeKind::Perfect => 2,
        }
    }
}

impl From<AnswerScore> for OutcomeKind {
    fn from(score: AnswerScore) -> Self {
        match score {
            AnswerScore::Perfect => OutcomeKind::Perfect,
            AnswerScore::Correct => OutcomeKind::Correct,
            AnswerScore::Partial | AnswerScore::Incorrect | AnswerScore::Other => {
                OutcomeKind::NoCredit
            }
        }
    }
}

/// Monotonic score counter.
///
/// `record` returns the new total so the caller can use it in the same step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAccumulator {
    total: u32,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: OutcomeKind) -> u32 {
        self.total = self.total.saturating_add(kind.points());
        self.total
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}
