//! # dnamatch
//!
//! Behavioral "DNA" profiling and matching for candidates and organizations.
//!
//! Questionnaire answers become eight-axis profiles (pace, collaboration,
//! decision, expression, uncertainty, growth, motivation, execution).
//! Organizations merge many respondents into one profile and earn a Culture
//! Authenticity Score. A two-stage matcher (hard eligibility filter, then
//! linear DNA distance) ranks candidate/role pairs that feed weekly drops.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! dnamatch seed --file demos/seed.json
//! dnamatch drop candidate alex-chen
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use dnamatch::prelude::*;
//!
//! let engine = ScoringEngine::individual().unwrap();
//! let scored = engine.score(&[Answer::choice("Q01", "A"), Answer::choice("Q02", "B")]);
//!
//! let organization = TargetProfile::organization("velocity-labs", DimensionVector::uniform(60.0));
//! let candidate = CandidateProfile::new("alex-chen", scored.scores, scored.consistency);
//!
//! let result = Matcher::default().match_pair(&candidate, &organization);
//! assert!(result.passed_l1);
//! assert!(result.score <= 100);
//! ```
//!
//! ## Crate Structure
//!
//! - `dnamatch-core` - Dimensions, question banks, scoring, aggregation, CAS
//! - `dnamatch-matching` - Eligibility filter, compatibility, lifecycle, drops
//! - `dnamatch-storage` - File-backed store and orchestration

// Re-export core types
pub use dnamatch_core::{
    Aggregator, Answer, BankKind, CasEstimator, CasResult, CasTier, Dimension, DimensionVector,
    EngineConfig, Error, OrganizationEvaluator, OrganizationProfile, Question, QuestionBank,
    Respondent, RespondentRole, Result, ScoredProfile, ScoringEngine, ScoringTable,
};

// Re-export matching
pub use dnamatch_matching::{
    CandidateProfile, Constraints, CuratedDrop, DropTarget, EligibilityFilter, MatchAction,
    MatchRecord, MatchResult, MatchStatus, Matcher, RemotePolicy, Side, TargetProfile,
};

// Re-export storage
pub use dnamatch_storage::{CandidateRecord, OrganizationRecord, RoleRecord, SeedData, Store};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Answer, BankKind, CandidateProfile, CasTier, Constraints, Dimension, DimensionVector,
        EngineConfig, Error, MatchResult, Matcher, OrganizationEvaluator, QuestionBank,
        Respondent, RespondentRole, Result, ScoringEngine, Store, TargetProfile,
    };
}
