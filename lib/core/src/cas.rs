//! Culture Authenticity Score.
//!
//! CAS rates how much an organization's respondents agree: with each other
//! (internal consistency) and HR versus everyone else (alignment).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aggregation::{RespondentRole, RoleScores};
use crate::config::CasConfig;
use crate::dimension::{Dimension, DimensionVector, MAX_SCORE, MIN_SCORE};
use crate::stats::{mean, round_to, sample_std_dev};

pub const GOLD_THRESHOLD: f64 = 85.0;
pub const SILVER_THRESHOLD: f64 = 65.0;
pub const BRONZE_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasTier {
    None,
    Bronze,
    Silver,
    Gold,
}

impl CasTier {
    /// Lower bounds are inclusive.
    pub fn for_score(score: f64) -> Self {
        if score >= GOLD_THRESHOLD {
            CasTier::Gold
        } else if score >= SILVER_THRESHOLD {
            CasTier::Silver
        } else if score >= BRONZE_THRESHOLD {
            CasTier::Bronze
        } else {
            CasTier::None
        }
    }
}

impl fmt::Display for CasTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CasTier::Gold => "gold",
            CasTier::Silver => "silver",
            CasTier::Bronze => "bronze",
            CasTier::None => "none",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CasResult {
    /// 0-100, two decimals.
    pub score: f64,
    pub tier: CasTier,
    /// 0-1, four decimals.
    pub internal_consistency: f64,
    /// 0-1, four decimals.
    pub hr_alignment: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CasEstimator {
    config: CasConfig,
}

impl CasEstimator {
    pub fn new(config: CasConfig) -> Self {
        Self { config }
    }

    /// Split a mixed respondent pool by role and estimate.
    pub fn estimate_pool(&self, respondents: &[RoleScores]) -> CasResult {
        let (hr, others): (Vec<&RoleScores>, Vec<&RoleScores>) = respondents
            .iter()
            .partition(|r| r.role == RespondentRole::Hr);
        let hr: Vec<DimensionVector> = hr.into_iter().map(|r| r.scores).collect();
        let others: Vec<DimensionVector> = others.into_iter().map(|r| r.scores).collect();
        self.estimate(&hr, &others)
    }

    pub fn estimate(&self, hr: &[DimensionVector], others: &[DimensionVector]) -> CasResult {
        let internal_consistency = internal_consistency(hr, others);
        let hr_alignment = hr_alignment(hr, others);

        let raw = self.config.consistency_weight * internal_consistency
            + self.config.alignment_weight * hr_alignment;
        let score = round_to(raw * 100.0, 2).clamp(MIN_SCORE, MAX_SCORE);

        CasResult {
            score,
            tier: CasTier::for_score(score),
            internal_consistency: round_to(internal_consistency, 4),
            hr_alignment: round_to(hr_alignment, 4),
        }
    }
}

/// One minus the mean per-axis spread across the whole pool, on a 0-100 scale.
fn internal_consistency(hr: &[DimensionVector], others: &[DimensionVector]) -> f64 {
    if hr.len() + others.len() < 2 {
        return 1.0;
    }

    let spreads: Vec<f64> = Dimension::ALL
        .into_iter()
        .map(|dim| {
            let values: Vec<f64> = hr.iter().chain(others).map(|v| v[dim]).collect();
            sample_std_dev(&values)
        })
        .collect();
    let avg = mean(&spreads).unwrap_or(0.0);
    (1.0 - avg / 100.0).clamp(0.0, 1.0)
}

/// One minus the mean per-axis gap between the HR mean and everyone else's mean.
fn hr_alignment(hr: &[DimensionVector], others: &[DimensionVector]) -> f64 {
    if hr.is_empty() || others.is_empty() {
        return 1.0;
    }

    let gaps: Vec<f64> = Dimension::ALL
        .into_iter()
        .map(|dim| {
            let hr_mean = hr.iter().map(|v| v[dim]).sum::<f64>() / hr.len() as f64;
            let other_mean = others.iter().map(|v| v[dim]).sum::<f64>() / others.len() as f64;
            (hr_mean - other_mean).abs()
        })
        .collect();
    let avg = mean(&gaps).unwrap_or(0.0);
    (1.0 - avg / 100.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(CasTier::for_score(85.0), CasTier::Gold);
        assert_eq!(CasTier::for_score(84.99), CasTier::Silver);
        assert_eq!(CasTier::for_score(65.0), CasTier::Silver);
        assert_eq!(CasTier::for_score(64.99), CasTier::Bronze);
        assert_eq!(CasTier::for_score(40.0), CasTier::Bronze);
        assert_eq!(CasTier::for_score(39.99), CasTier::None);
        assert_eq!(CasTier::for_score(0.0), CasTier::None);
        assert_eq!(CasTier::for_score(100.0), CasTier::Gold);
    }

    #[test]
    fn test_empty_pool_is_perfect() {
        let cas = CasEstimator::default().estimate(&[], &[]);
        assert_eq!(cas.internal_consistency, 1.0);
        assert_eq!(cas.hr_alignment, 1.0);
        assert_eq!(cas.score, 100.0);
        assert_eq!(cas.tier, CasTier::Gold);
    }

    #[test]
    fn test_single_group_skips_alignment() {
        let employees = [DimensionVector::uniform(40.0), DimensionVector::uniform(60.0)];
        let cas = CasEstimator::default().estimate(&[], &employees);
        assert_eq!(cas.hr_alignment, 1.0);
        // std of [40, 60] is 14.1421 on every axis
        assert_eq!(cas.internal_consistency, 0.8586);
        // 0.55 * 0.858579 + 0.45 = 0.922218
        assert_eq!(cas.score, 92.22);
    }

    #[test]
    fn test_hr_gap_lowers_alignment() {
        let hr = [DimensionVector::uniform(90.0)];
        let employees = [DimensionVector::uniform(50.0), DimensionVector::uniform(50.0)];
        let cas = CasEstimator::default().estimate(&hr, &employees);
        assert_eq!(cas.hr_alignment, 0.6);
        // std of [90, 50, 50] is 23.094
        assert_eq!(cas.internal_consistency, 0.7691);
        // 0.55 * 0.769060 + 0.45 * 0.6 = 0.692983
        assert_eq!(cas.score, 69.3);
        assert_eq!(cas.tier, CasTier::Silver);
    }

    #[test]
    fn test_estimate_pool_partitions_roles() {
        let pool = [
            RoleScores::new(RespondentRole::Hr, DimensionVector::uniform(90.0)),
            RoleScores::new(RespondentRole::Employee, DimensionVector::uniform(50.0)),
            RoleScores::new(RespondentRole::Employee, DimensionVector::uniform(50.0)),
        ];
        let estimator = CasEstimator::default();
        let split = estimator.estimate(
            &[DimensionVector::uniform(90.0)],
            &[DimensionVector::uniform(50.0), DimensionVector::uniform(50.0)],
        );
        assert_eq!(estimator.estimate_pool(&pool), split);
    }

    #[test]
    fn test_total_disagreement_stays_in_range() {
        let hr = [DimensionVector::uniform(100.0)];
        let employees = [DimensionVector::uniform(0.0)];
        let cas = CasEstimator::default().estimate(&hr, &employees);
        assert_eq!(cas.hr_alignment, 0.0);
        assert!(cas.score >= 0.0 && cas.score <= 100.0);
        assert_eq!(cas.tier, CasTier::None);
    }
}
