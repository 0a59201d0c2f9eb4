//! Demo seed data: pre-profiled organizations and candidates plus roles.

use chrono::Utc;
use dnamatch_core::{DimensionVector, Result, ScoredProfile};
use dnamatch_matching::Constraints;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::records::{CandidateRecord, OrganizationRecord, RoleRecord};
use crate::store::Store;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedOrganization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    pub scores: DimensionVector,
    /// Declared CAS on the 0-100 scale.
    #[serde(default)]
    pub cas: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCandidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub scores: DimensionVector,
    pub consistency: f64,
    #[serde(default)]
    pub constraints: Constraints,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub organizations: Vec<SeedOrganization>,
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
    #[serde(default)]
    pub candidates: Vec<SeedCandidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub organizations: usize,
    pub roles: usize,
    pub candidates: usize,
}

impl SeedData {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}

impl Store {
    /// Upsert every seed record. Organizations go in first so their roles
    /// can reference them.
    pub fn load_seed(&self, seed: &SeedData) -> Result<SeedSummary> {
        let now = Utc::now();

        for org in &seed.organizations {
            let mut record = OrganizationRecord::new(&org.id, now);
            record.name = Some(org.name.clone());
            record.industry = org.industry.clone();
            record.scores = Some(org.scores);
            record.consistency = org.cas.map(|cas| cas / 100.0);
            self.upsert_organization(record);
        }

        for role in &seed.roles {
            self.upsert_role(role.clone())?;
        }

        for cand in &seed.candidates {
            let mut record = CandidateRecord::new(&cand.id, now);
            record.name = Some(cand.name.clone());
            record.title = cand.title.clone();
            record.profile = Some(ScoredProfile {
                scores: cand.scores,
                consistency: cand.consistency,
            });
            record.constraints = cand.constraints.clone();
            self.upsert_candidate(record);
        }

        let summary = SeedSummary {
            organizations: seed.organizations.len(),
            roles: seed.roles.len(),
            candidates: seed.candidates.len(),
        };
        info!(
            organizations = summary.organizations,
            roles = summary.roles,
            candidates = summary.candidates,
            "seed data loaded"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnamatch_core::EngineConfig;

    const SEED: &str = r#"{
        "organizations": [{
            "id": "bloom-education", "name": "Bloom Education", "cas": 74,
            "scores": {"pace": 60, "collab": 75, "decision": 48, "expression": 72,
                       "unc": 58, "growth": 70, "motiv": 88, "execution": 55}
        }],
        "roles": [{"id": "bloom-fullstack", "organization_id": "bloom-education",
                   "title": "Full-Stack Engineer", "remote_policy": "hybrid"}],
        "candidates": [{
            "id": "priya-sharma", "name": "Priya Sharma", "consistency": 0.89,
            "scores": {"pace": 68, "collab": 80, "decision": 42, "expression": 70,
                       "unc": 62, "growth": 80, "motiv": 90, "execution": 50}
        }]
    }"#;

    #[test]
    fn test_load_seed() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path(), EngineConfig::default()).unwrap();
        let seed = SeedData::from_json_str(SEED).unwrap();

        let summary = store.load_seed(&seed).unwrap();
        assert_eq!(summary, SeedSummary { organizations: 1, roles: 1, candidates: 1 });

        let org = store.organization("bloom-education").unwrap();
        assert_eq!(org.consistency, Some(0.74));
        assert!(org.cas.is_none());

        assert_eq!(store.run_matching(), 1);
        assert_eq!(store.matches()[0].result.score, 84);
    }

    #[test]
    fn test_seed_role_needs_known_organization() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path(), EngineConfig::default()).unwrap();
        let seed = SeedData {
            roles: vec![RoleRecord::new("r1", "nowhere", "Engineer")],
            ..SeedData::default()
        };
        assert!(store.load_seed(&seed).is_err());
    }
}
