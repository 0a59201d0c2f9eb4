//! Match lifecycle.
//!
//! A stored match carries one optional action from each side; its status is
//! always derived from the two actions, never set directly.

use chrono::{DateTime, Utc};
use dnamatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::drop::week_label;
use crate::matcher::MatchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchAction {
    Accept,
    Pass,
}

impl FromStr for MatchAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "accept" => Ok(MatchAction::Accept),
            "pass" => Ok(MatchAction::Pass),
            other => Err(Error::InvalidConfig(format!("unknown action '{}'", other))),
        }
    }
}

/// Which party acts on a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Candidate,
    Organization,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Candidate => f.write_str("candidate"),
            Side::Organization => f.write_str("organization"),
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "candidate" => Ok(Side::Candidate),
            "organization" | "company" => Ok(Side::Organization),
            other => Err(Error::InvalidConfig(format!("unknown side '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    CandidateAccepted,
    CompanyAccepted,
    Mutual,
    Passed,
}

/// A pass from either side ends the match; two accepts make it mutual.
pub fn status_from_actions(
    candidate: Option<MatchAction>,
    organization: Option<MatchAction>,
) -> MatchStatus {
    use MatchAction::*;
    match (candidate, organization) {
        (Some(Pass), _) | (_, Some(Pass)) => MatchStatus::Passed,
        (Some(Accept), Some(Accept)) => MatchStatus::Mutual,
        (Some(Accept), None) => MatchStatus::CandidateAccepted,
        (None, Some(Accept)) => MatchStatus::CompanyAccepted,
        (None, None) => MatchStatus::Pending,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub result: MatchResult,
    pub status: MatchStatus,
    pub candidate_action: Option<MatchAction>,
    pub organization_action: Option<MatchAction>,
    /// `%Y-W%W` label of the week the match was computed in.
    pub week: String,
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(result: MatchResult, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            result,
            status: MatchStatus::Pending,
            candidate_action: None,
            organization_action: None,
            week: week_label(now),
            created_at: now,
        }
    }

    pub fn action(&self, side: Side) -> Option<MatchAction> {
        match side {
            Side::Candidate => self.candidate_action,
            Side::Organization => self.organization_action,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MatchStatus::Pending
    }

    /// A new record with `side`'s action set and the status recomputed.
    /// Each side may act once.
    pub fn apply(&self, side: Side, action: MatchAction) -> Result<Self> {
        if self.action(side).is_some() {
            return Err(Error::AlreadyActed(self.id.to_string()));
        }

        let mut next = self.clone();
        match side {
            Side::Candidate => next.candidate_action = Some(action),
            Side::Organization => next.organization_action = Some(action),
        }
        next.status = status_from_actions(next.candidate_action, next.organization_action);
        Ok(next)
    }
}
