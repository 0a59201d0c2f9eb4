//! Scoring tables.
//!
//! A scoring table is hand-authored content stating what each answer option
//! means on the eight axes. Choice options carry raw per-axis scores; ranking
//! and budget options name the single axis they feed plus a direction label
//! saying which end of that axis a high rank or allocation pushes toward.
//!
//! Tables are JSON assets versioned alongside the question banks:
//!
//! ```json
//! {
//!   "bank": "individual",
//!   "version": 1,
//!   "choice":  { "Q01": { "A": { "pace": 80, "decision": 50 } } },
//!   "ranking": { "Q09": { "A": { "dimension": "growth", "direction": "specialist" } } },
//!   "budget":  { "Q10": { "A": { "dimension": "collab", "direction": "low_collab" } } }
//! }
//! ```

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::dimension::{Dimension, MAX_SCORE, MIN_SCORE};
use crate::error::{Error, Result};
use crate::question::{BankKind, QuestionBank, QuestionType};

const INDIVIDUAL_TABLE_JSON: &str = include_str!("../data/individual_scoring.json");
const ORGANIZATION_TABLE_JSON: &str = include_str!("../data/organization_scoring.json");

/// Ranking labels that sit at the low end of their axis.
const LOW_END_RANK_LABELS: [&str; 3] = ["specialist", "financial", "balance"];

/// Direction label attached to a ranking or budget option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Direction(String);

impl Direction {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A top rank on this label means a *low* axis score.
    pub fn inverts_rank(&self) -> bool {
        LOW_END_RANK_LABELS.contains(&self.0.as_str()) || self.0.starts_with("low_")
    }

    /// A large allocation on this label means a *low* axis score.
    ///
    /// `mid_` and unrecognized labels pass through unchanged.
    pub fn inverts_budget(&self) -> bool {
        self.0.starts_with("low_")
    }
}

/// Axis and direction fed by one ranking or budget option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionTarget {
    pub dimension: Dimension,
    #[serde(default)]
    pub direction: Direction,
}

pub type ChoiceScores = BTreeMap<Dimension, f64>;

type OptionMap<T> = AHashMap<String, T>;

/// Lookup from `(question id, option key)` to scoring meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringTable {
    pub bank: BankKind,
    pub version: u32,
    #[serde(default)]
    choice: AHashMap<String, OptionMap<ChoiceScores>>,
    #[serde(default)]
    ranking: AHashMap<String, OptionMap<OptionTarget>>,
    #[serde(default)]
    budget: AHashMap<String, OptionMap<OptionTarget>>,
}

impl ScoringTable {
    pub fn individual() -> Result<Self> {
        Self::from_json_str(INDIVIDUAL_TABLE_JSON)
    }

    pub fn organization() -> Result<Self> {
        Self::from_json_str(ORGANIZATION_TABLE_JSON)
    }

    pub fn builtin(kind: BankKind) -> Result<Self> {
        match kind {
            BankKind::Individual => Self::individual(),
            BankKind::Organization => Self::organization(),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let table: ScoringTable =
            serde_json::from_str(s).map_err(|e| Error::ScoringTable(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Every raw choice score must lie on the axis range.
    pub fn validate(&self) -> Result<()> {
        for (qid, options) in &self.choice {
            for (key, scores) in options {
                for (dim, score) in scores {
                    if !(MIN_SCORE..=MAX_SCORE).contains(score) {
                        return Err(Error::ScoringTable(format!(
                            "{}/{} scores {} on {} outside [0, 100]",
                            qid, key, score, dim
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Cross-check the table against a question bank: every scored question
    /// exists with the matching type, and every scored key is one of its options.
    pub fn validate_against(&self, bank: &QuestionBank) -> Result<()> {
        if bank.kind() != self.bank {
            return Err(Error::ScoringTable(format!(
                "table is for the {} bank, got {}",
                self.bank,
                bank.kind()
            )));
        }

        let sections = [
            (QuestionType::Choice, self.choice.iter().map(keys_of).collect::<Vec<_>>()),
            (QuestionType::Ranking, self.ranking.iter().map(keys_of).collect()),
            (QuestionType::Budget, self.budget.iter().map(keys_of).collect()),
        ];

        for (expected, entries) in sections {
            for (qid, keys) in entries {
                let question = bank
                    .get(qid)
                    .ok_or_else(|| Error::ScoringTable(format!("{} is not in the bank", qid)))?;
                if question.question_type != expected {
                    return Err(Error::ScoringTable(format!(
                        "{} is scored as {:?} but the bank says {:?}",
                        qid, expected, question.question_type
                    )));
                }
                if let Some(key) = keys.iter().find(|k| !question.has_option(k)) {
                    return Err(Error::ScoringTable(format!("{} has no option '{}'", qid, key)));
                }
            }
        }
        Ok(())
    }

    /// Raw axis scores for a chosen option. `None` when the question is not
    /// in the table.
    pub fn choice(&self, question_id: &str) -> Option<&OptionMap<ChoiceScores>> {
        self.choice.get(question_id)
    }

    pub fn ranking(&self, question_id: &str) -> Option<&OptionMap<OptionTarget>> {
        self.ranking.get(question_id)
    }

    pub fn budget(&self, question_id: &str) -> Option<&OptionMap<OptionTarget>> {
        self.budget.get(question_id)
    }

    /// Number of questions the table knows how to score.
    pub fn question_count(&self) -> usize {
        self.choice.len() + self.ranking.len() + self.budget.len()
    }
}

fn keys_of<'a, T>((qid, options): (&'a String, &'a OptionMap<T>)) -> (&'a str, Vec<&'a str>) {
    (qid.as_str(), options.keys().map(String::as_str).collect())
}
