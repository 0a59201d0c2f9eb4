//! Persistent record types.

use chrono::{DateTime, Utc};
use dnamatch_core::{Answer, CasResult, DimensionVector, RespondentRole, ScoredProfile};
use dnamatch_matching::{CandidateProfile, Constraints, RemotePolicy, TargetProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Scores and consistency from the latest answer set, or seeded directly.
    #[serde(default)]
    pub profile: Option<ScoredProfile>,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<Answer>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateRecord {
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: None,
            title: None,
            profile: None,
            constraints: Constraints::default(),
            answers: Vec::new(),
            updated_at: now,
        }
    }

    /// The matcher's view, if this candidate has been profiled.
    pub fn to_profile(&self) -> Option<CandidateProfile> {
        self.profile.map(|p| {
            CandidateProfile::new(self.id.clone(), p.scores, p.consistency)
                .with_constraints(self.constraints.clone())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRespondent {
    pub role: RespondentRole,
    pub answers: Vec<Answer>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default)]
    pub scores: Option<DimensionVector>,
    /// Present once the profile was computed from respondents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cas: Option<CasResult>,
    /// CAS / 100.
    #[serde(default)]
    pub consistency: Option<f64>,
    /// Keyed by respondent id; a resubmission replaces the earlier answers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub respondents: BTreeMap<String, StoredRespondent>,
    pub updated_at: DateTime<Utc>,
}

impl OrganizationRecord {
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: None,
            industry: None,
            scores: None,
            cas: None,
            consistency: None,
            respondents: BTreeMap::new(),
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// An open position. Only `skills`, `location` and `remote_policy` take part
/// in eligibility; the rest is listing content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: String,
    pub organization_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nice_to_have: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<SalaryRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_policy: Option<RemotePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl RoleRecord {
    pub fn new(
        id: impl Into<String>,
        organization_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            organization_id: organization_id.into(),
            title: title.into(),
            level: None,
            skills: Vec::new(),
            nice_to_have: Vec::new(),
            salary_range: None,
            location: None,
            remote_policy: None,
            description: None,
            active: true,
        }
    }

    pub fn constraints(&self) -> Constraints {
        Constraints {
            location: self.location.clone(),
            remote_policy: self.remote_policy,
            skills: self.skills.clone(),
        }
    }

    /// The matcher's view of this role against its organization's profile.
    pub fn to_target(&self, organization_scores: DimensionVector) -> TargetProfile {
        TargetProfile::role(&self.organization_id, &self.id, organization_scores)
            .with_constraints(self.constraints())
    }
}
