//! Drop curation: the weekly batch of top pending matches delivered to one
//! candidate or one organization.

use chrono::{DateTime, Utc};
use dnamatch_core::{DropConfig, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

use crate::lifecycle::{MatchRecord, Side};

/// `%Y-W%W`: year plus Monday-based week number, e.g. `2026-W41`.
pub fn week_label(now: DateTime<Utc>) -> String {
    now.format("%Y-W%W").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropTarget {
    Candidate,
    Organization,
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropTarget::Candidate => f.write_str("candidate"),
            DropTarget::Organization => f.write_str("organization"),
        }
    }
}

impl FromStr for DropTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "candidate" => Ok(DropTarget::Candidate),
            "organization" | "company" => Ok(DropTarget::Organization),
            other => Err(Error::InvalidConfig(format!("unknown drop target '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedDrop {
    pub id: Uuid,
    pub week: String,
    pub target: DropTarget,
    pub target_id: String,
    pub match_ids: Vec<Uuid>,
    pub revealed_at: DateTime<Utc>,
}

impl CuratedDrop {
    fn new(target: DropTarget, target_id: &str, picked: &[&MatchRecord], now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            week: week_label(now),
            target,
            target_id: target_id.to_string(),
            match_ids: picked.iter().map(|r| r.id).collect(),
            revealed_at: now,
        }
    }
}

/// Undecided by `side`, and still pending overall.
fn awaiting(record: &MatchRecord, side: Side) -> bool {
    record.is_pending() && record.action(side).is_none()
}

/// Highest-scoring first; earlier records win ties.
fn top_n<'a>(mut picked: Vec<&'a MatchRecord>, n: usize) -> Vec<&'a MatchRecord> {
    picked.sort_by(|a, b| b.result.score.cmp(&a.result.score));
    picked.truncate(n);
    picked
}

/// Top `n` pending matches the candidate has not acted on.
pub fn curate_candidate<'a>(
    records: &'a [MatchRecord],
    candidate_id: &str,
    n: usize,
) -> Vec<&'a MatchRecord> {
    let picked = records
        .iter()
        .filter(|r| r.result.candidate_id == candidate_id && awaiting(r, Side::Candidate))
        .collect();
    top_n(picked, n)
}

/// Top `n` pending matches per active role that the organization has not
/// acted on, concatenated in role order.
pub fn curate_organization<'a, S: AsRef<str>>(
    records: &'a [MatchRecord],
    organization_id: &str,
    active_role_ids: &[S],
    n: usize,
) -> Vec<&'a MatchRecord> {
    active_role_ids
        .iter()
        .flat_map(move |role_id| {
            let role_id = role_id.as_ref();
            let picked = records
                .iter()
                .filter(|r| {
                    r.result.organization_id == organization_id
                        && r.result.role_id.as_deref() == Some(role_id)
                        && awaiting(r, Side::Organization)
                })
                .collect();
            top_n(picked, n)
        })
        .collect()
}

/// How many matches go into each drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropPolicy {
    pub candidate_top_n: usize,
    pub role_top_n: usize,
}

impl Default for DropPolicy {
    fn default() -> Self {
        Self::from(&DropConfig::default())
    }
}

impl From<&DropConfig> for DropPolicy {
    fn from(config: &DropConfig) -> Self {
        Self {
            candidate_top_n: config.candidate_top_n,
            role_top_n: config.role_top_n,
        }
    }
}

impl DropPolicy {
    pub fn candidate_drop(
        &self,
        records: &[MatchRecord],
        candidate_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CuratedDrop> {
        let picked = curate_candidate(records, candidate_id, self.candidate_top_n);
        if picked.is_empty() {
            return Err(Error::NoPendingMatches(format!("candidate {}", candidate_id)));
        }
        debug!(candidate = candidate_id, matches = picked.len(), "curated candidate drop");
        Ok(CuratedDrop::new(DropTarget::Candidate, candidate_id, &picked, now))
    }

    pub fn organization_drop<S: AsRef<str>>(
        &self,
        records: &[MatchRecord],
        organization_id: &str,
        active_role_ids: &[S],
        now: DateTime<Utc>,
    ) -> Result<CuratedDrop> {
        if active_role_ids.is_empty() {
            return Err(Error::NoActiveRoles(organization_id.to_string()));
        }
        let picked = curate_organization(records, organization_id, active_role_ids, self.role_top_n);
        if picked.is_empty() {
            return Err(Error::NoPendingMatches(format!("organization {}", organization_id)));
        }
        debug!(
            organization = organization_id,
            roles = active_role_ids.len(),
            matches = picked.len(),
            "curated organization drop"
        );
        Ok(CuratedDrop::new(DropTarget::Organization, organization_id, &picked, now))
    }
}
