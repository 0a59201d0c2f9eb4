//! Organization evaluation.
//!
//! An organization profile is a whole-pool statistic: adding one respondent
//! changes the median and the CAS, so the evaluator always re-scores every
//! respondent from raw answers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregation::{Aggregator, RespondentRole, RoleScores};
use crate::answer::Answer;
use crate::cas::{CasEstimator, CasResult};
use crate::config::EngineConfig;
use crate::dimension::DimensionVector;
use crate::error::Result;
use crate::scoring::ScoringEngine;
use crate::table::ScoringTable;

/// One person's organization-bank submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Respondent {
    pub role: RespondentRole,
    pub answers: Vec<Answer>,
}

impl Respondent {
    pub fn new(role: RespondentRole, answers: Vec<Answer>) -> Self {
        Self { role, answers }
    }

    pub fn hr(answers: Vec<Answer>) -> Self {
        Self::new(RespondentRole::Hr, answers)
    }

    pub fn employee(answers: Vec<Answer>) -> Self {
        Self::new(RespondentRole::Employee, answers)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrganizationProfile {
    pub scores: DimensionVector,
    pub cas: CasResult,
    /// `cas.score / 100`; stands in for a candidate's consistency wherever an
    /// organization profile needs a single confidence value.
    pub consistency: f64,
    pub respondent_count: usize,
}

#[derive(Debug, Clone)]
pub struct OrganizationEvaluator {
    engine: ScoringEngine,
    aggregator: Aggregator,
    cas: CasEstimator,
}

impl OrganizationEvaluator {
    pub fn new(table: ScoringTable, config: &EngineConfig) -> Self {
        Self {
            engine: ScoringEngine::new(table),
            aggregator: Aggregator::new(config.aggregation.clone()),
            cas: CasEstimator::new(config.cas.clone()),
        }
    }

    /// Evaluator over the built-in organization table.
    pub fn builtin(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(ScoringTable::organization()?, config))
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn evaluate(&self, respondents: &[Respondent]) -> OrganizationProfile {
        let pool: Vec<RoleScores> = respondents
            .iter()
            .map(|r| RoleScores::new(r.role, self.engine.profile(&r.answers)))
            .collect();
        self.evaluate_scored(&pool)
    }

    /// Evaluate a pool whose members are already scored.
    pub fn evaluate_scored(&self, pool: &[RoleScores]) -> OrganizationProfile {
        let scores = self.aggregator.aggregate(pool);
        let cas = self.cas.estimate_pool(pool);
        debug!(
            respondents = pool.len(),
            cas = cas.score,
            tier = %cas.tier,
            "evaluated organization"
        );

        OrganizationProfile {
            scores,
            cas,
            consistency: cas.score / 100.0,
            respondent_count: pool.len(),
        }
    }
}
