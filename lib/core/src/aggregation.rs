//! Aggregation Engine
//!
//! Merges the profiles of several respondents from one organization into a
//! single organization profile. Per axis:
//!
//! 1. weight each respondent by role (HR 0.5, everyone else 1.0);
//! 2. once the pool reaches the trim threshold (7), drop the single highest
//!    and single lowest raw value;
//! 3. take the weighted median of what remains.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::config::AggregationConfig;
use crate::dimension::{Dimension, DimensionVector};
use crate::error::Error;
use crate::stats::{round_to, weighted_median};

/// Who filled in an organization questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RespondentRole {
    Hr,
    Employee,
}

impl RespondentRole {
    /// Parse a free-form role tag: exactly `"hr"` is HR; anything else,
    /// including `"HR"`, is treated as a rank-and-file employee.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "hr" {
            RespondentRole::Hr
        } else {
            RespondentRole::Employee
        }
    }
}

impl fmt::Display for RespondentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespondentRole::Hr => f.write_str("hr"),
            RespondentRole::Employee => f.write_str("employee"),
        }
    }
}

impl FromStr for RespondentRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

/// One respondent's scored profile and role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleScores {
    pub role: RespondentRole,
    pub scores: DimensionVector,
}

impl RoleScores {
    pub fn new(role: RespondentRole, scores: DimensionVector) -> Self {
        Self { role, scores }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregationConfig,
}

impl Aggregator {
    pub fn new(config: AggregationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    #[inline]
    pub fn weight_for(&self, role: RespondentRole) -> f64 {
        match role {
            RespondentRole::Hr => self.config.hr_weight,
            RespondentRole::Employee => self.config.employee_weight,
        }
    }

    /// Merge respondents into one profile. No respondents yields all-neutral.
    pub fn aggregate(&self, respondents: &[RoleScores]) -> DimensionVector {
        if respondents.is_empty() {
            return DimensionVector::neutral();
        }

        let trimming = respondents.len() >= self.config.trim_threshold;
        debug!(
            respondents = respondents.len(),
            trimming, "aggregating organization profile"
        );

        DimensionVector::from_fn(|dim| round_to(self.aggregate_axis(dim, respondents, trimming), 2))
    }

    fn aggregate_axis(&self, dim: Dimension, respondents: &[RoleScores], trimming: bool) -> f64 {
        let mut pairs: Vec<(f64, f64)> = respondents
            .iter()
            .map(|r| (r.scores[dim], self.weight_for(r.role)))
            .collect();

        if trimming {
            // Stable sort keeps earlier respondents first among equal values.
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            pairs.remove(pairs.len() - 1);
            pairs.remove(0);
        }

        weighted_median(&pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::NEUTRAL_SCORE;

    fn employee(v: f64) -> RoleScores {
        RoleScores::new(RespondentRole::Employee, DimensionVector::uniform(v))
    }

    fn hr(v: f64) -> RoleScores {
        RoleScores::new(RespondentRole::Hr, DimensionVector::uniform(v))
    }

    #[test]
    fn test_empty_pool_is_neutral() {
        let agg = Aggregator::default();
        assert_eq!(agg.aggregate(&[]), DimensionVector::neutral());
    }

    #[test]
    fn test_single_respondent_passes_through() {
        let agg = Aggregator::default();
        let scores = DimensionVector::new([10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0]);
        let merged = agg.aggregate(&[RoleScores::new(RespondentRole::Hr, scores)]);
        assert_eq!(merged, scores);
    }

    #[test]
    fn test_hr_weight_lowers_influence() {
        let agg = Aggregator::default();
        // Employee 40 (w=1.0), HR 80 (w=0.5): total 1.5, half 0.75 -> reached at 40.
        let merged = agg.aggregate(&[hr(80.0), employee(40.0)]);
        assert_eq!(merged[Dimension::Pace], 40.0);

        // Two HR voices weigh as much as one employee.
        let merged = agg.aggregate(&[hr(80.0), hr(90.0), employee(20.0)]);
        // sorted: 20 (1.0), 80 (0.5), 90 (0.5); half of 2.0 is 1.0 -> 20
        assert_eq!(merged[Dimension::Pace], 20.0);
    }

    #[test]
    fn test_no_trimming_below_threshold() {
        let agg = Aggregator::default();
        // Six respondents: 10, 20, 30, 40, 50, 95 all employees.
        // total 6, half 3 -> cumulative reaches 3 at 30.
        let pool: Vec<_> = [10.0, 20.0, 30.0, 40.0, 50.0, 95.0].map(employee).to_vec();
        assert_eq!(agg.aggregate(&pool)[Dimension::Growth], 30.0);
    }

    #[test]
    fn test_trimming_at_threshold_changes_result() {
        let agg = Aggregator::default();
        // Trimmed to 10..50, total 5, half 2.5 -> 30.
        let pool = vec![
            hr(0.0),
            employee(10.0),
            employee(20.0),
            employee(30.0),
            employee(40.0),
            employee(50.0),
            employee(95.0),
        ];
        assert_eq!(agg.aggregate(&pool)[Dimension::Pace], 30.0);

        let six = vec![
            employee(10.0),
            employee(12.0),
            employee(14.0),
            employee(60.0),
            employee(62.0),
            employee(64.0),
        ];
        // total 6, half 3 -> 14
        assert_eq!(agg.aggregate(&six)[Dimension::Pace], 14.0);

        let mut seven = six.clone();
        seven.push(employee(66.0));
        // Trim 10 and 66: 12, 14, 60, 62, 64; total 5, half 2.5 -> 60
        assert_eq!(agg.aggregate(&seven)[Dimension::Pace], 60.0);
    }

    #[test]
    fn test_trimming_ignores_weight() {
        let agg = Aggregator::default();
        // The lowest raw value is an employee; it is trimmed regardless of weight.
        let pool = vec![
            employee(5.0),
            hr(50.0),
            hr(50.0),
            hr(50.0),
            hr(50.0),
            hr(50.0),
            employee(99.0),
        ];
        assert_eq!(agg.aggregate(&pool)[Dimension::Decision], 50.0);
    }

    #[test]
    fn test_zero_weights_fall_back_to_neutral() {
        let agg = Aggregator::new(AggregationConfig {
            hr_weight: 0.0,
            ..AggregationConfig::default()
        });
        let merged = agg.aggregate(&[hr(80.0), hr(20.0)]);
        assert_eq!(merged, DimensionVector::uniform(NEUTRAL_SCORE));
    }

    #[test]
    fn test_role_tags() {
        assert_eq!(RespondentRole::from_tag("hr"), RespondentRole::Hr);
        assert_eq!(RespondentRole::from_tag("HR"), RespondentRole::Employee);
        assert_eq!(RespondentRole::from_tag("employee"), RespondentRole::Employee);
        assert_eq!(RespondentRole::from_tag("engineer"), RespondentRole::Employee);
    }
}
