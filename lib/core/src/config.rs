//! Engine configuration.
//!
//! Defaults reproduce the reference calibration. A JSON file may override any
//! section; omitted keys keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub aggregation: AggregationConfig,
    pub cas: CasConfig,
    pub eligibility: EligibilityConfig,
    pub validation: ValidationPolicy,
    pub drops: DropConfig,
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn validate(&self) -> Result<()> {
        let a = &self.aggregation;
        if a.hr_weight < 0.0 || a.employee_weight < 0.0 {
            return Err(Error::InvalidConfig("respondent weights must be non-negative".into()));
        }
        if a.trim_threshold < 3 {
            return Err(Error::InvalidConfig(format!(
                "trim_threshold must be at least 3, got {}",
                a.trim_threshold
            )));
        }

        let c = &self.cas;
        if c.consistency_weight < 0.0 || c.alignment_weight < 0.0 {
            return Err(Error::InvalidConfig("CAS weights must be non-negative".into()));
        }
        if c.consistency_weight + c.alignment_weight <= 0.0 {
            return Err(Error::InvalidConfig("CAS weights cannot both be zero".into()));
        }

        if self.drops.candidate_top_n == 0 || self.drops.role_top_n == 0 {
            return Err(Error::InvalidConfig("drop sizes must be at least 1".into()));
        }
        Ok(())
    }
}

/// Multi-respondent merge parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Weight of an HR respondent.
    pub hr_weight: f64,
    /// Weight of any other respondent.
    pub employee_weight: f64,
    /// Respondent count at which the extreme high and low values are dropped.
    pub trim_threshold: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            hr_weight: 0.5,
            employee_weight: 1.0,
            trim_threshold: 7,
        }
    }
}

/// Culture Authenticity Score blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasConfig {
    pub consistency_weight: f64,
    pub alignment_weight: f64,
}

impl Default for CasConfig {
    fn default() -> Self {
        Self {
            consistency_weight: 0.55,
            alignment_weight: 0.45,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityConfig {
    pub location_match: LocationMatch,
}

/// How on-site location equality is decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMatch {
    /// Case-sensitive string equality.
    #[default]
    Exact,
    /// Trimmed, case-insensitive equality.
    CaseInsensitive,
}

impl LocationMatch {
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            LocationMatch::Exact => a == b,
            LocationMatch::CaseInsensitive => a.trim().to_lowercase() == b.trim().to_lowercase(),
        }
    }
}

/// Boundary validation applied before scoring when `strict` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    pub strict: bool,
    pub budget_policy: BudgetPolicy,
}

/// Treatment of budget allocations whose percentages do not sum to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPolicy {
    /// Accept any sum; the direction-adjusted raw values are used as-is.
    #[default]
    Permissive,
    /// Reject allocations that do not sum to exactly 100.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    /// Matches per candidate drop.
    pub candidate_top_n: usize,
    /// Matches per active role in an organization drop.
    pub role_top_n: usize,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            candidate_top_n: 3,
            role_top_n: 5,
        }
    }
}
