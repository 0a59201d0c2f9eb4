//! Answer Scoring Engine
//!
//! Turns a respondent's answers into an eight-axis profile. Every answer
//! contributes zero or more `(axis, value)` observations:
//!
//! - **choice**: the chosen option's raw scores from the table.
//! - **ranking**: Borda position score `(N - i) / N * 100` for the option at
//!   position `i`, inverted (`100 - score`) for low-end direction labels.
//! - **budget**: the allocated percentage, inverted for `low_` labels.
//!
//! Each axis is the mean of its observations (two decimals), or the neutral
//! 50.0 when nothing touched it. Consistency summarizes how much the
//! observations on each axis disagree.

use smallvec::SmallVec;
use tracing::debug;

use crate::answer::Answer;
use crate::dimension::{Dimension, DimensionVector, DIMENSION_COUNT, MAX_SCORE, NEUTRAL_SCORE};
use crate::error::Result;
use crate::question::BankKind;
use crate::stats::{mean, round_to, sample_std_dev};
use crate::table::ScoringTable;

/// Half the axis range; a mean deviation this large means zero consistency.
const CONSISTENCY_SCALE: f64 = 50.0;

/// Output of scoring one respondent.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScoredProfile {
    pub scores: DimensionVector,
    /// Self-agreement in `[0, 1]`.
    pub consistency: f64,
}

/// Per-axis observations gathered from an answer set.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    observations: [SmallVec<[f64; 8]>; DIMENSION_COUNT],
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, dim: Dimension, value: f64) {
        self.observations[dim.index()].push(value);
    }

    pub fn observations(&self, dim: Dimension) -> &[f64] {
        &self.observations[dim.index()]
    }

    pub fn total_observations(&self) -> usize {
        self.observations.iter().map(SmallVec::len).sum()
    }

    /// Mean per axis, neutral where empty.
    pub fn profile(&self) -> DimensionVector {
        DimensionVector::from_fn(|dim| {
            mean(self.observations(dim))
                .map(|m| round_to(m, 2))
                .unwrap_or(NEUTRAL_SCORE)
        })
    }

    /// `1 - mean(std per axis) / 50`, clamped to `[0, 1]`, four decimals.
    ///
    /// Axes with fewer than two observations count as zero deviation.
    pub fn consistency(&self) -> f64 {
        let total_std: f64 = self.observations.iter().map(|obs| sample_std_dev(obs)).sum();
        let mean_std = total_std / DIMENSION_COUNT as f64;
        let consistency = 1.0 - mean_std / CONSISTENCY_SCALE;
        round_to(consistency.clamp(0.0, 1.0), 4)
    }
}

/// Table-driven scorer for one question bank.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    table: ScoringTable,
}

impl ScoringEngine {
    pub fn new(table: ScoringTable) -> Self {
        Self { table }
    }

    /// Engine over the built-in individual table.
    pub fn individual() -> Result<Self> {
        Ok(Self::new(ScoringTable::individual()?))
    }

    /// Engine over the built-in organization table.
    pub fn organization() -> Result<Self> {
        Ok(Self::new(ScoringTable::organization()?))
    }

    pub fn builtin(kind: BankKind) -> Result<Self> {
        Ok(Self::new(ScoringTable::builtin(kind)?))
    }

    pub fn table(&self) -> &ScoringTable {
        &self.table
    }

    pub fn bank(&self) -> BankKind {
        self.table.bank
    }

    /// Gather observations for every answer the table knows about.
    ///
    /// Answers to questions absent from the table contribute nothing.
    pub fn accumulate(&self, answers: &[Answer]) -> Accumulator {
        let mut acc = Accumulator::new();
        for answer in answers {
            let known = match answer {
                Answer::Choice { question_id, selected_key } => {
                    self.score_choice(question_id, selected_key, &mut acc)
                }
                Answer::Ranking { question_id, ranking } => {
                    self.score_ranking(question_id, ranking, &mut acc)
                }
                Answer::Budget { question_id, allocations } => {
                    self.score_budget(question_id, allocations, &mut acc)
                }
            };
            if !known {
                debug!(
                    bank = %self.table.bank,
                    question_id = answer.question_id(),
                    "skipping answer to unscored question"
                );
            }
        }
        acc
    }

    /// Profile and consistency for one respondent.
    pub fn score(&self, answers: &[Answer]) -> ScoredProfile {
        let acc = self.accumulate(answers);
        let scored = ScoredProfile {
            scores: acc.profile(),
            consistency: acc.consistency(),
        };
        debug!(
            bank = %self.table.bank,
            answers = answers.len(),
            observations = acc.total_observations(),
            consistency = scored.consistency,
            "scored answer set"
        );
        scored
    }

    /// Profile only, for banks where consistency is not used.
    pub fn profile(&self, answers: &[Answer]) -> DimensionVector {
        self.accumulate(answers).profile()
    }

    fn score_choice(&self, question_id: &str, selected_key: &str, acc: &mut Accumulator) -> bool {
        let Some(options) = self.table.choice(question_id) else {
            return false;
        };
        if let Some(scores) = options.get(selected_key) {
            for (&dim, &value) in scores {
                acc.push(dim, value);
            }
        }
        true
    }

    fn score_ranking(&self, question_id: &str, ranking: &[String], acc: &mut Accumulator) -> bool {
        let Some(options) = self.table.ranking(question_id) else {
            return false;
        };
        let n = ranking.len();
        for (position, key) in ranking.iter().enumerate() {
            let Some(target) = options.get(key) else {
                continue;
            };
            let borda = (n - position) as f64;
            let mut score = (borda / n as f64) * MAX_SCORE;
            if target.direction.inverts_rank() {
                score = MAX_SCORE - score;
            }
            acc.push(target.dimension, score);
        }
        true
    }

    fn score_budget<'a, I>(&self, question_id: &str, allocations: I, acc: &mut Accumulator) -> bool
    where
        I: IntoIterator<Item = (&'a String, &'a i32)>,
    {
        let Some(options) = self.table.budget(question_id) else {
            return false;
        };
        for (key, &pct) in allocations {
            let Some(target) = options.get(key) else {
                continue;
            };
            let mut score = f64::from(pct);
            if target.direction.inverts_budget() {
                score = MAX_SCORE - score;
            }
            acc.push(target.dimension, score);
        }
        true
    }
}
