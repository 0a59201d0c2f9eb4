use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::question::QuestionType;

/// One questionnaire answer, shaped by the type of the question it answers.
///
/// Serialized with an internal `type` tag:
///
/// ```json
/// {"type": "choice", "question_id": "Q01", "selected_key": "A"}
/// {"type": "ranking", "question_id": "Q09", "ranking": ["B", "A", "C", "D", "E"]}
/// {"type": "budget", "question_id": "Q10", "allocations": {"A": 40, "B": 60}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Answer {
    /// Exactly one selected option.
    Choice {
        question_id: String,
        selected_key: String,
    },
    /// Every option key ordered most-preferred first.
    Ranking {
        question_id: String,
        ranking: Vec<String>,
    },
    /// Option key to integer percentage.
    Budget {
        question_id: String,
        allocations: BTreeMap<String, i32>,
    },
}

impl Answer {
    pub fn choice(question_id: impl Into<String>, selected_key: impl Into<String>) -> Self {
        Answer::Choice {
            question_id: question_id.into(),
            selected_key: selected_key.into(),
        }
    }

    pub fn ranking<I, S>(question_id: impl Into<String>, ranking: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Ranking {
            question_id: question_id.into(),
            ranking: ranking.into_iter().map(Into::into).collect(),
        }
    }

    pub fn budget<I, S>(question_id: impl Into<String>, allocations: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        Answer::Budget {
            question_id: question_id.into(),
            allocations: allocations.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn question_id(&self) -> &str {
        match self {
            Answer::Choice { question_id, .. }
            | Answer::Ranking { question_id, .. }
            | Answer::Budget { question_id, .. } => question_id,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Answer::Choice { .. } => QuestionType::Choice,
            Answer::Ranking { .. } => QuestionType::Ranking,
            Answer::Budget { .. } => QuestionType::Budget,
        }
    }
}
