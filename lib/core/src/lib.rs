//! # dnamatch Core
//!
//! Core library for dnamatch: eight-axis "DNA" profiles derived from
//! questionnaire answers.
//!
//! This crate provides the scoring pipeline up to the point of matching:
//!
//! - [`QuestionBank`] - The individual (30) and organization (20) questionnaires
//! - [`ScoringTable`] - What each answer option means on the eight axes
//! - [`ScoringEngine`] - Answers to a [`DimensionVector`] plus a consistency scalar
//! - [`Aggregator`] - Role-weighted, outlier-trimmed merge of many respondents
//! - [`CasEstimator`] - Culture Authenticity Score from respondent agreement
//! - [`OrganizationEvaluator`] - All of the above for one organization pool
//!
//! ## Example
//!
//! ```rust
//! use dnamatch_core::{Answer, Dimension, ScoringEngine};
//!
//! let engine = ScoringEngine::individual().unwrap();
//! let scored = engine.score(&[
//!     Answer::choice("Q01", "A"),
//!     Answer::ranking("Q24", ["B", "A", "C", "D"]),
//! ]);
//!
//! assert_eq!(scored.scores[Dimension::Pace], 80.0);
//! assert!(scored.consistency <= 1.0);
//! ```

pub mod aggregation;
pub mod answer;
pub mod cas;
pub mod config;
pub mod dimension;
pub mod error;
pub mod organization;
pub mod question;
pub mod scoring;
pub mod stats;
pub mod table;

pub use aggregation::{Aggregator, RespondentRole, RoleScores};
pub use answer::Answer;
pub use cas::{CasEstimator, CasResult, CasTier};
pub use config::{
    AggregationConfig, BudgetPolicy, CasConfig, DropConfig, EligibilityConfig, EngineConfig,
    LocationMatch, ValidationPolicy,
};
pub use dimension::{Dimension, DimensionVector, DIMENSION_COUNT, NEUTRAL_SCORE};
pub use error::{Error, Result};
pub use organization::{OrganizationEvaluator, OrganizationProfile, Respondent};
pub use question::{BankKind, Question, QuestionBank, QuestionOption, QuestionType};
pub use scoring::{Accumulator, ScoredProfile, ScoringEngine};
pub use table::{Direction, OptionTarget, ScoringTable};
