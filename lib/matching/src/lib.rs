//! # dnamatch Matching
//!
//! Pairwise matching of candidate profiles against organization or role
//! profiles, plus the lifecycle and weekly curation of stored matches.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Candidate  │────>│ L1 filter   │────>│ L2 compat.  │
//! │  + Target   │     │ (boolean)   │     │ (distance)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                            └────> MatchResult <┘
//!                                        │
//!                                ┌───────────────┐
//!                                │  MatchRecord  │──> CuratedDrop
//!                                │ (lifecycle)   │
//!                                └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use dnamatch_core::DimensionVector;
//! use dnamatch_matching::{CandidateProfile, Matcher, TargetProfile};
//!
//! let candidate = CandidateProfile::new(
//!     "alex-chen",
//!     DimensionVector::new([78.0, 45.0, 60.0, 75.0, 70.0, 30.0, 55.0, 35.0]),
//!     0.91,
//! );
//! let target = TargetProfile::organization(
//!     "velocity-labs",
//!     DimensionVector::new([82.0, 40.0, 55.0, 78.0, 75.0, 35.0, 70.0, 30.0]),
//! );
//!
//! let result = Matcher::default().match_pair(&candidate, &target);
//! assert!(result.passed_l1);
//! assert_eq!(result.score, 86);
//! ```

pub mod compatibility;
pub mod drop;
pub mod eligibility;
pub mod lifecycle;
pub mod matcher;

pub use compatibility::{axis_compatibility, compatibility, Compatibility};
pub use drop::{curate_candidate, curate_organization, week_label, CuratedDrop, DropPolicy, DropTarget};
pub use eligibility::{Constraints, Eligibility, EligibilityFilter, RemotePolicy, Rule, Verdict};
pub use lifecycle::{status_from_actions, MatchAction, MatchRecord, MatchStatus, Side};
pub use matcher::{CandidateProfile, MatchResult, Matcher, TargetProfile};
