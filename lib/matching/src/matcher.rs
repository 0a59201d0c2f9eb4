//! Two-stage matcher: L1 eligibility, then L2 compatibility.
//!
//! Every pair is independent, so batch ranking fans out over rayon.

use dnamatch_core::{DimensionVector, EligibilityConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::compatibility::{compatibility, Compatibility};
use crate::eligibility::{Constraints, EligibilityFilter};

/// An individual as the matcher sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: String,
    pub scores: DimensionVector,
    /// Self-agreement of the candidate's own answers, `[0, 1]`.
    pub consistency: f64,
    #[serde(default)]
    pub constraints: Constraints,
}

impl CandidateProfile {
    pub fn new(id: impl Into<String>, scores: DimensionVector, consistency: f64) -> Self {
        Self {
            id: id.into(),
            scores,
            consistency,
            constraints: Constraints::default(),
        }
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }
}

/// An organization, or one of its roles, as the matcher sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProfile {
    pub organization_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    pub scores: DimensionVector,
    #[serde(default)]
    pub constraints: Constraints,
}

impl TargetProfile {
    pub fn organization(organization_id: impl Into<String>, scores: DimensionVector) -> Self {
        Self {
            organization_id: organization_id.into(),
            role_id: None,
            scores,
            constraints: Constraints::default(),
        }
    }

    pub fn role(
        organization_id: impl Into<String>,
        role_id: impl Into<String>,
        scores: DimensionVector,
    ) -> Self {
        Self {
            role_id: Some(role_id.into()),
            ..Self::organization(organization_id, scores)
        }
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }
}

/// Outcome of matching one candidate against one target. A value, never
/// patched: re-running the matcher produces a new result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: String,
    pub organization_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    pub score: u8,
    pub dimension_scores: DimensionVector,
    pub passed_l1: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Matcher {
    filter: EligibilityFilter,
}

impl Matcher {
    pub fn new(filter: EligibilityFilter) -> Self {
        Self { filter }
    }

    pub fn from_config(config: &EligibilityConfig) -> Self {
        Self::new(EligibilityFilter::standard(config.location_match))
    }

    pub fn filter(&self) -> &EligibilityFilter {
        &self.filter
    }

    /// Match a single pair. L1 failure yields score 0 with an all-zero
    /// breakdown and `passed_l1 == false`.
    pub fn match_pair(&self, candidate: &CandidateProfile, target: &TargetProfile) -> MatchResult {
        let rejection = self.filter.rejection(&candidate.constraints, &target.constraints);

        let outcome = match rejection {
            Some(rule) => {
                debug!(
                    candidate = %candidate.id,
                    organization = %target.organization_id,
                    role = target.role_id.as_deref().unwrap_or("-"),
                    rule = rule.name(),
                    "pair rejected by eligibility filter"
                );
                Compatibility::zero()
            }
            None => compatibility(&candidate.scores, &target.scores, candidate.consistency),
        };

        MatchResult {
            candidate_id: candidate.id.clone(),
            organization_id: target.organization_id.clone(),
            role_id: target.role_id.clone(),
            score: outcome.score,
            dimension_scores: outcome.dimensions,
            passed_l1: rejection.is_none(),
        }
    }

    /// Eligible targets for one candidate, best first.
    pub fn rank_targets(
        &self,
        candidate: &CandidateProfile,
        targets: &[TargetProfile],
    ) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = targets
            .par_iter()
            .map(|t| self.match_pair(candidate, t))
            .filter(|r| r.passed_l1)
            .collect();
        results.sort_by(ranking_order);
        results
    }

    /// Eligible candidates for one target, best first.
    pub fn rank_candidates(
        &self,
        target: &TargetProfile,
        candidates: &[CandidateProfile],
    ) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = candidates
            .par_iter()
            .map(|c| self.match_pair(c, target))
            .filter(|r| r.passed_l1)
            .collect();
        results.sort_by(ranking_order);
        results
    }

    /// Every eligible candidate x target pair, best first.
    pub fn match_all(
        &self,
        candidates: &[CandidateProfile],
        targets: &[TargetProfile],
    ) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = candidates
            .par_iter()
            .flat_map_iter(|c| targets.iter().map(move |t| self.match_pair(c, t)))
            .filter(|r| r.passed_l1)
            .collect();
        results.sort_by(ranking_order);
        debug!(
            candidates = candidates.len(),
            targets = targets.len(),
            eligible = results.len(),
            "matched all pairs"
        );
        results
    }
}

/// Score descending, then ids ascending.
fn ranking_order(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.organization_id.cmp(&b.organization_id))
        .then_with(|| a.role_id.cmp(&b.role_id))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::RemotePolicy;
    use dnamatch_core::{Dimension, LocationMatch};

    fn alex() -> CandidateProfile {
        CandidateProfile::new(
            "alex-chen",
            DimensionVector::new([78.0, 45.0, 60.0, 75.0, 70.0, 30.0, 55.0, 35.0]),
            0.91,
        )
    }

    fn velocity() -> TargetProfile {
        TargetProfile::organization(
            "velocity-labs",
            DimensionVector::new([82.0, 40.0, 55.0, 78.0, 75.0, 35.0, 70.0, 30.0]),
        )
    }

    fn meridian() -> TargetProfile {
        TargetProfile::organization(
            "meridian-financial",
            DimensionVector::new([32.0, 68.0, 80.0, 45.0, 25.0, 55.0, 40.0, 82.0]),
        )
    }

    #[test]
    fn test_match_pair_without_constraints() {
        let result = Matcher::default().match_pair(&alex(), &velocity());
        assert!(result.passed_l1);
        assert_eq!(result.score, 86);
        assert_eq!(result.candidate_id, "alex-chen");
        assert_eq!(result.organization_id, "velocity-labs");
        assert_eq!(result.role_id, None);
    }

    #[test]
    fn test_skill_mismatch_short_circuits() {
        // Identical DNA, disjoint skills.
        let candidate = CandidateProfile::new("c", DimensionVector::uniform(60.0), 1.0)
            .with_constraints(Constraints::new().with_skills(["Rust"]));
        let target = TargetProfile::role("o", "r", DimensionVector::uniform(60.0))
            .with_constraints(Constraints::new().with_skills(["Excel"]));

        let result = Matcher::default().match_pair(&candidate, &target);
        assert!(!result.passed_l1);
        assert_eq!(result.score, 0);
        assert_eq!(result.dimension_scores, DimensionVector::uniform(0.0));
        assert_eq!(result.role_id.as_deref(), Some("r"));
    }

    #[test]
    fn test_location_mode_from_config() {
        let candidate = alex().with_constraints(Constraints::new().with_location("shanghai"));
        let target = velocity().with_constraints(
            Constraints::new()
                .with_location("Shanghai")
                .with_remote_policy(RemotePolicy::Onsite),
        );

        let exact = Matcher::default();
        assert!(!exact.match_pair(&candidate, &target).passed_l1);

        let relaxed = Matcher::from_config(&EligibilityConfig {
            location_match: LocationMatch::CaseInsensitive,
        });
        assert!(relaxed.match_pair(&candidate, &target).passed_l1);
    }

    #[test]
    fn test_rank_targets_orders_by_score() {
        let ranked = Matcher::default().rank_targets(&alex(), &[meridian(), velocity()]);
        let ids: Vec<_> = ranked.iter().map(|r| r.organization_id.as_str()).collect();
        assert_eq!(ids, ["velocity-labs", "meridian-financial"]);
        assert_eq!(ranked[0].score, 86);
        assert_eq!(ranked[1].score, 62);
    }

    #[test]
    fn test_rank_drops_ineligible_pairs() {
        let gated = meridian().with_constraints(Constraints::new().with_skills(["Excel"]));
        let candidate = alex().with_constraints(Constraints::new().with_skills(["Rust"]));
        let ranked = Matcher::default().rank_targets(&candidate, &[gated, velocity()]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].organization_id, "velocity-labs");
    }

    #[test]
    fn test_ties_break_by_id() {
        let scores = DimensionVector::uniform(50.0);
        let a = CandidateProfile::new("b-second", scores, 1.0);
        let b = CandidateProfile::new("a-first", scores, 1.0);
        let target = TargetProfile::organization("o", scores);
        let ranked = Matcher::default().rank_candidates(&target, &[a, b]);
        assert_eq!(ranked[0].candidate_id, "a-first");
        assert_eq!(ranked[1].candidate_id, "b-second");
    }

    #[test]
    fn test_match_all_covers_every_pair() {
        let other = CandidateProfile::new("priya", DimensionVector::uniform(50.0), 0.89);
        let results = Matcher::default().match_all(&[alex(), other], &[velocity(), meridian()]);
        assert_eq!(results.len(), 4);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_result_serializes_dimension_map() {
        let result = Matcher::default().match_pair(&alex(), &velocity());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score"], 86);
        assert_eq!(json["dimension_scores"]["motiv"], 85.0);
        assert_eq!(json["passed_l1"], true);
        assert!(json.get("role_id").is_none());
        assert_eq!(result.dimension_scores[Dimension::Motivation], 85.0);
    }
}
