//! L1 eligibility filter.
//!
//! A hard boolean gate evaluated before any DNA comparison. Rules run in
//! order and the first one that reaches a verdict decides the pair.

use ahash::AHashSet;
use dnamatch_core::{Error, LocationMatch};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a role expects people to work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemotePolicy {
    Remote,
    Hybrid,
    Onsite,
}

impl fmt::Display for RemotePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemotePolicy::Remote => f.write_str("remote"),
            RemotePolicy::Hybrid => f.write_str("hybrid"),
            RemotePolicy::Onsite => f.write_str("onsite"),
        }
    }
}

impl FromStr for RemotePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "remote-first" | "remote_first" => Ok(RemotePolicy::Remote),
            "hybrid" => Ok(RemotePolicy::Hybrid),
            "onsite" | "on-site" | "on_site" => Ok(RemotePolicy::Onsite),
            other => Err(Error::InvalidConfig(format!("unknown remote policy '{}'", other))),
        }
    }
}

/// Hard-constraint facts about one side of a pair. Every field is optional;
/// an absent fact never causes a rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_policy: Option<RemotePolicy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_remote_policy(mut self, policy: RemotePolicy) -> Self {
        self.remote_policy = Some(policy);
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    fn declared_location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.is_empty())
    }
}

pub trait Eligibility {
    fn is_eligible(&self, candidate: &Constraints, target: &Constraints) -> bool;
}

/// The outcome of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The pair is eligible; later rules are not consulted.
    Pass,
    /// The pair is rejected.
    Fail,
    /// This rule has no opinion.
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// A remote role removes every other constraint.
    RemoteFirst,
    /// On-site roles require the candidate to be in the same place.
    OnsiteLocation(LocationMatch),
    /// Declared skill lists must share at least one skill, case-insensitively.
    SkillOverlap,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::RemoteFirst => "remote_first",
            Rule::OnsiteLocation(_) => "onsite_location",
            Rule::SkillOverlap => "skill_overlap",
        }
    }

    pub fn check(&self, candidate: &Constraints, target: &Constraints) -> Verdict {
        match self {
            Rule::RemoteFirst => {
                if target.remote_policy == Some(RemotePolicy::Remote) {
                    Verdict::Pass
                } else {
                    Verdict::Continue
                }
            }
            Rule::OnsiteLocation(mode) => {
                if target.remote_policy != Some(RemotePolicy::Onsite) {
                    return Verdict::Continue;
                }
                match (candidate.declared_location(), target.declared_location()) {
                    (Some(a), Some(b)) if !mode.matches(a, b) => Verdict::Fail,
                    _ => Verdict::Continue,
                }
            }
            Rule::SkillOverlap => {
                if candidate.skills.is_empty() || target.skills.is_empty() {
                    return Verdict::Continue;
                }
                let wanted: AHashSet<String> =
                    target.skills.iter().map(|s| s.to_lowercase()).collect();
                if candidate.skills.iter().any(|s| wanted.contains(&s.to_lowercase())) {
                    Verdict::Continue
                } else {
                    Verdict::Fail
                }
            }
        }
    }
}

/// Ordered rule chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityFilter {
    rules: Vec<Rule>,
}

impl Default for EligibilityFilter {
    fn default() -> Self {
        Self::standard(LocationMatch::default())
    }
}

impl EligibilityFilter {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Remote-first, then on-site location, then skill overlap.
    pub fn standard(location_match: LocationMatch) -> Self {
        Self::new(vec![
            Rule::RemoteFirst,
            Rule::OnsiteLocation(location_match),
            Rule::SkillOverlap,
        ])
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The first rule that rejected the pair, or `None` if it is eligible.
    pub fn rejection(&self, candidate: &Constraints, target: &Constraints) -> Option<Rule> {
        for rule in &self.rules {
            match rule.check(candidate, target) {
                Verdict::Pass => return None,
                Verdict::Fail => return Some(*rule),
                Verdict::Continue => {}
            }
        }
        None
    }
}

impl Eligibility for EligibilityFilter {
    fn is_eligible(&self, candidate: &Constraints, target: &Constraints) -> bool {
        self.rejection(candidate, target).is_none()
    }
}
