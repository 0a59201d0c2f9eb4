use ahash::AHashSet;
use chrono::{DateTime, Utc};
use dnamatch_core::{
    Answer, EngineConfig, Error, OrganizationEvaluator, OrganizationProfile, QuestionBank,
    RespondentRole, Result, RoleScores, ScoredProfile, ScoringEngine,
};
use dnamatch_matching::{
    week_label, CandidateProfile, Constraints, CuratedDrop, DropPolicy, DropTarget, MatchAction,
    MatchRecord, Matcher, Side, TargetProfile,
};
use parking_lot::RwLock;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::records::{CandidateRecord, OrganizationRecord, RoleRecord, StoredRespondent};
use crate::snapshot::{SnapshotFile, StoreState};

/// A drop together with the matches it points at.
#[derive(Debug, Clone, Serialize)]
pub struct DropView {
    #[serde(flatten)]
    pub drop: CuratedDrop,
    pub matches: Vec<MatchRecord>,
}

/// File-backed store plus the engines that keep its derived data current.
///
/// Mutations update memory only; call [`Store::save`] to persist.
pub struct Store {
    data_dir: PathBuf,
    snapshot: SnapshotFile,
    state: RwLock<StoreState>,
    config: EngineConfig,
    individual_bank: QuestionBank,
    organization_bank: QuestionBank,
    scorer: ScoringEngine,
    evaluator: OrganizationEvaluator,
    matcher: Matcher,
    drops: DropPolicy,
}

impl Store {
    pub fn open<P: AsRef<Path>>(data_dir: P, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let snapshot = SnapshotFile::new(&data_dir);
        let state = snapshot.load()?.unwrap_or_default();
        info!(
            path = %snapshot.path().display(),
            candidates = state.candidates.len(),
            organizations = state.organizations.len(),
            roles = state.roles.len(),
            matches = state.matches.len(),
            "store opened"
        );

        Ok(Self {
            data_dir,
            snapshot,
            state: RwLock::new(state),
            individual_bank: QuestionBank::individual()?,
            organization_bank: QuestionBank::organization()?,
            scorer: ScoringEngine::individual()?,
            evaluator: OrganizationEvaluator::builtin(&config)?,
            matcher: Matcher::from_config(&config.eligibility),
            drops: DropPolicy::from(&config.drops),
            config,
        })
    }

    #[inline]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn save(&self) -> Result<()> {
        let state = self.state.read();
        self.snapshot.save(&state)?;
        info!(path = %self.snapshot.path().display(), "store saved");
        Ok(())
    }

    /// A copy of everything currently held.
    pub fn state(&self) -> StoreState {
        self.state.read().clone()
    }

    // ==================== Candidates ====================

    /// Score an individual answer set and make it the candidate's profile,
    /// creating the candidate if needed.
    pub fn submit_candidate_answers(&self, candidate_id: &str, answers: Vec<Answer>) -> Result<ScoredProfile> {
        if self.config.validation.strict {
            self.individual_bank
                .validate_answers(&answers, &self.config.validation)?;
        }

        let scored = self.scorer.score(&answers);
        let now = Utc::now();
        let mut state = self.state.write();
        let record = state
            .candidates
            .entry(candidate_id.to_string())
            .or_insert_with(|| CandidateRecord::new(candidate_id, now));
        record.profile = Some(scored);
        record.answers = answers;
        record.updated_at = now;

        debug!(candidate = candidate_id, consistency = scored.consistency, "candidate profiled");
        Ok(scored)
    }

    pub fn upsert_candidate(&self, record: CandidateRecord) {
        self.state.write().candidates.insert(record.id.clone(), record);
    }

    pub fn set_candidate_constraints(&self, candidate_id: &str, constraints: Constraints) -> Result<()> {
        let mut state = self.state.write();
        let record = state
            .candidates
            .get_mut(candidate_id)
            .ok_or_else(|| Error::NotFound(format!("candidate {}", candidate_id)))?;
        record.constraints = constraints;
        record.updated_at = Utc::now();
        Ok(())
    }

    pub fn candidate(&self, candidate_id: &str) -> Option<CandidateRecord> {
        self.state.read().candidates.get(candidate_id).cloned()
    }

    // ==================== Organizations ====================

    /// Store one respondent's raw answers and recompute the organization
    /// profile and CAS from the full respondent pool.
    pub fn submit_respondent(
        &self,
        organization_id: &str,
        respondent_id: &str,
        role: RespondentRole,
        answers: Vec<Answer>,
    ) -> Result<OrganizationProfile> {
        if self.config.validation.strict {
            self.organization_bank
                .validate_answers(&answers, &self.config.validation)?;
        }

        let now = Utc::now();
        let mut state = self.state.write();
        let record = state
            .organizations
            .entry(organization_id.to_string())
            .or_insert_with(|| OrganizationRecord::new(organization_id, now));
        record.respondents.insert(
            respondent_id.to_string(),
            StoredRespondent { role, answers, submitted_at: now },
        );

        let pool: Vec<RoleScores> = record
            .respondents
            .values()
            .map(|r| RoleScores::new(r.role, self.evaluator.engine().profile(&r.answers)))
            .collect();
        let profile = self.evaluator.evaluate_scored(&pool);

        record.scores = Some(profile.scores);
        record.cas = Some(profile.cas);
        record.consistency = Some(profile.consistency);
        record.updated_at = now;

        info!(
            organization = organization_id,
            respondents = profile.respondent_count,
            cas = profile.cas.score,
            tier = %profile.cas.tier,
            "organization re-evaluated"
        );
        Ok(profile)
    }

    pub fn upsert_organization(&self, record: OrganizationRecord) {
        self.state.write().organizations.insert(record.id.clone(), record);
    }

    pub fn organization(&self, organization_id: &str) -> Option<OrganizationRecord> {
        self.state.read().organizations.get(organization_id).cloned()
    }

    // ==================== Roles ====================

    /// Insert or replace a role. Its organization must already exist.
    pub fn upsert_role(&self, role: RoleRecord) -> Result<()> {
        let mut state = self.state.write();
        if !state.organizations.contains_key(&role.organization_id) {
            return Err(Error::NotFound(format!("organization {}", role.organization_id)));
        }
        state.roles.insert(role.id.clone(), role);
        Ok(())
    }

    pub fn active_role_ids(&self, organization_id: &str) -> Vec<String> {
        self.state
            .read()
            .roles
            .values()
            .filter(|r| r.active && r.organization_id == organization_id)
            .map(|r| r.id.clone())
            .collect()
    }

    // ==================== Matching ====================

    pub fn run_matching(&self) -> usize {
        self.run_matching_at(Utc::now())
    }

    /// Match every profiled candidate against every active role whose
    /// organization has a profile. Pairs already matched this week and pairs
    /// rejected by the eligibility filter are not stored. Returns the number
    /// of new matches.
    pub fn run_matching_at(&self, now: DateTime<Utc>) -> usize {
        let mut state = self.state.write();

        let candidates: Vec<CandidateProfile> = state
            .candidates
            .values()
            .filter_map(CandidateRecord::to_profile)
            .collect();
        let targets: Vec<TargetProfile> = state
            .roles
            .values()
            .filter(|r| r.active)
            .filter_map(|r| {
                let scores = state.organizations.get(&r.organization_id)?.scores?;
                Some(r.to_target(scores))
            })
            .collect();

        if candidates.is_empty() || targets.is_empty() {
            info!(
                candidates = candidates.len(),
                roles = targets.len(),
                "not enough data to match"
            );
            return 0;
        }

        let week = week_label(now);
        let existing: AHashSet<(String, Option<String>)> = state
            .matches
            .iter()
            .filter(|m| m.week == week)
            .map(|m| (m.result.candidate_id.clone(), m.result.role_id.clone()))
            .collect();

        let fresh: Vec<MatchRecord> = self
            .matcher
            .match_all(&candidates, &targets)
            .into_iter()
            .filter(|r| !existing.contains(&(r.candidate_id.clone(), r.role_id.clone())))
            .map(|r| MatchRecord::new(r, now))
            .collect();

        let created = fresh.len();
        state.matches.extend(fresh);
        info!(week = %week, candidates = candidates.len(), roles = targets.len(), created, "matching run complete");
        created
    }

    pub fn matches(&self) -> Vec<MatchRecord> {
        self.state.read().matches.clone()
    }

    pub fn match_record(&self, match_id: Uuid) -> Option<MatchRecord> {
        self.state.read().matches.iter().find(|m| m.id == match_id).cloned()
    }

    /// Apply one side's decision; each side may act on a match once.
    pub fn record_action(&self, match_id: Uuid, side: Side, action: MatchAction) -> Result<MatchRecord> {
        let mut state = self.state.write();
        let slot = state
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or_else(|| Error::NotFound(format!("match {}", match_id)))?;

        let next = slot.apply(side, action)?;
        *slot = next.clone();
        info!(match_id = %match_id, side = %side, status = ?next.status, "match action recorded");
        Ok(next)
    }

    // ==================== Drops ====================

    pub fn generate_candidate_drop(&self, candidate_id: &str) -> Result<CuratedDrop> {
        let mut state = self.state.write();
        let drop = self.drops.candidate_drop(&state.matches, candidate_id, Utc::now())?;
        state.drops.push(drop.clone());
        info!(candidate = candidate_id, matches = drop.match_ids.len(), week = %drop.week, "candidate drop generated");
        Ok(drop)
    }

    pub fn generate_organization_drop(&self, organization_id: &str) -> Result<CuratedDrop> {
        let role_ids = self.active_role_ids(organization_id);
        let mut state = self.state.write();
        let drop = self
            .drops
            .organization_drop(&state.matches, organization_id, role_ids.as_slice(), Utc::now())?;
        state.drops.push(drop.clone());
        info!(
            organization = organization_id,
            matches = drop.match_ids.len(),
            week = %drop.week,
            "organization drop generated"
        );
        Ok(drop)
    }

    /// The most recent drop for a target, with its matches resolved.
    pub fn current_drop(&self, target: DropTarget, target_id: &str) -> Option<DropView> {
        let state = self.state.read();
        let drop = state
            .drops
            .iter()
            .filter(|d| d.target == target && d.target_id == target_id)
            .max_by_key(|d| d.revealed_at)?
            .clone();
        let matches = drop
            .match_ids
            .iter()
            .filter_map(|id| state.matches.iter().find(|m| m.id == *id).cloned())
            .collect();
        Some(DropView { drop, matches })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnamatch_core::{BudgetPolicy, CasTier, DimensionVector, ValidationPolicy};
    use dnamatch_matching::{MatchStatus, RemotePolicy};

    fn open(dir: &tempfile::TempDir) -> Store {
        Store::open(dir.path(), EngineConfig::default()).unwrap()
    }

    fn seeded(store: &Store) {
        let now = Utc::now();
        let mut org = OrganizationRecord::new("velocity-labs", now);
        org.scores = Some(DimensionVector::new([82.0, 40.0, 55.0, 78.0, 75.0, 35.0, 70.0, 30.0]));
        store.upsert_organization(org);

        let mut role = RoleRecord::new("velocity-frontend", "velocity-labs", "Frontend Engineer");
        role.remote_policy = Some(RemotePolicy::Remote);
        store.upsert_role(role).unwrap();

        let mut alex = CandidateRecord::new("alex-chen", now);
        alex.profile = Some(ScoredProfile {
            scores: DimensionVector::new([78.0, 45.0, 60.0, 75.0, 70.0, 30.0, 55.0, 35.0]),
            consistency: 0.91,
        });
        store.upsert_candidate(alex);
    }

    #[test]
    fn test_submit_candidate_answers() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        let scored = store
            .submit_candidate_answers("c1", vec![Answer::choice("Q01", "A")])
            .unwrap();
        assert_eq!(scored.consistency, 1.0);

        let record = store.candidate("c1").unwrap();
        assert_eq!(record.profile, Some(scored));
        assert_eq!(record.answers.len(), 1);
    }

    #[test]
    fn test_strict_validation_rejects_bad_answers() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EngineConfig::default();
        config.validation = ValidationPolicy { strict: true, budget_policy: BudgetPolicy::Reject };
        let store = Store::open(dir.path(), config).unwrap();

        let bad = vec![Answer::budget("Q10", [("A", 10)])];
        assert!(store.submit_candidate_answers("c1", bad).is_err());
        assert!(store.candidate("c1").is_none());
    }

    #[test]
    fn test_submit_respondent_recomputes_pool() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        let answers = vec![Answer::choice("CQ01", "A")];

        let first = store
            .submit_respondent("o1", "hr-1", RespondentRole::Hr, answers.clone())
            .unwrap();
        assert_eq!(first.respondent_count, 1);

        let second = store
            .submit_respondent("o1", "emp-1", RespondentRole::Employee, answers.clone())
            .unwrap();
        assert_eq!(second.respondent_count, 2);
        assert_eq!(second.cas.tier, CasTier::Gold);

        // Resubmitting replaces, it does not add.
        let third = store
            .submit_respondent("o1", "emp-1", RespondentRole::Employee, answers)
            .unwrap();
        assert_eq!(third.respondent_count, 2);

        let record = store.organization("o1").unwrap();
        assert_eq!(record.consistency, Some(third.consistency));
    }

    #[test]
    fn test_role_requires_organization() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        let role = RoleRecord::new("r1", "ghost", "Engineer");
        assert!(matches!(store.upsert_role(role), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_run_matching_skips_this_weeks_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        seeded(&store);

        let now = Utc::now();
        assert_eq!(store.run_matching_at(now), 1);
        assert_eq!(store.run_matching_at(now), 0);
        assert_eq!(store.matches()[0].result.score, 86);

        let next_week = now + chrono::Duration::days(7);
        assert_eq!(store.run_matching_at(next_week), 1);
    }

    #[test]
    fn test_ineligible_pairs_are_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        seeded(&store);

        let mut role = RoleRecord::new("velocity-data", "velocity-labs", "Data Engineer");
        role.skills = vec!["Spark".into()];
        store.upsert_role(role).unwrap();
        store
            .set_candidate_constraints("alex-chen", Constraints::new().with_skills(["React"]))
            .unwrap();

        // Only the remote role passes.
        assert_eq!(store.run_matching(), 1);
        assert_eq!(store.matches()[0].result.role_id.as_deref(), Some("velocity-frontend"));
    }

    #[test]
    fn test_actions_and_drops() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        seeded(&store);
        store.run_matching();

        let drop = store.generate_candidate_drop("alex-chen").unwrap();
        assert_eq!(drop.match_ids.len(), 1);
        let view = store.current_drop(DropTarget::Candidate, "alex-chen").unwrap();
        assert_eq!(view.drop.id, drop.id);
        assert_eq!(view.matches[0].result.score, 86);

        let org_drop = store.generate_organization_drop("velocity-labs").unwrap();
        assert_eq!(org_drop.match_ids, drop.match_ids);

        let id = drop.match_ids[0];
        let updated = store.record_action(id, Side::Candidate, MatchAction::Accept).unwrap();
        assert_eq!(updated.status, MatchStatus::CandidateAccepted);
        assert!(matches!(
            store.record_action(id, Side::Candidate, MatchAction::Pass),
            Err(Error::AlreadyActed(_))
        ));

        // Nothing left for the candidate once they have acted.
        assert!(matches!(
            store.generate_candidate_drop("alex-chen"),
            Err(Error::NoPendingMatches(_))
        ));

        let mutual = store
            .record_action(id, Side::Organization, MatchAction::Accept)
            .unwrap();
        assert_eq!(mutual.status, MatchStatus::Mutual);
    }

    #[test]
    fn test_organization_drop_without_roles() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.upsert_organization(OrganizationRecord::new("empty-co", Utc::now()));
        assert!(matches!(
            store.generate_organization_drop("empty-co"),
            Err(Error::NoActiveRoles(_))
        ));
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = open(&dir);
            seeded(&store);
            store.run_matching();
            store.save().unwrap();
        }
        let store = open(&dir);
        assert_eq!(store.matches().len(), 1);
        assert!(store.candidate("alex-chen").is_some());
        assert_eq!(store.active_role_ids("velocity-labs"), ["velocity-frontend"]);
    }

    #[test]
    fn test_unknown_match_action() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        assert!(matches!(
            store.record_action(Uuid::new_v4(), Side::Candidate, MatchAction::Accept),
            Err(Error::NotFound(_))
        ));
    }
}
