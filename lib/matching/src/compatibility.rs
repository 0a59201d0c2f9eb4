//! L2 DNA compatibility.
//!
//! Linear distance per axis: `1 - |c - t| / 100`. The overall score is the
//! unweighted mean over the eight axes, discounted by the candidate's own
//! consistency. Per-axis values are reported undiscounted.

use dnamatch_core::stats::round_to;
use dnamatch_core::{Dimension, DimensionVector, DIMENSION_COUNT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Compatibility {
    /// 0-100 integer percentage.
    pub score: u8,
    /// Per-axis compatibility, 0-100 with two decimals.
    pub dimensions: DimensionVector,
}

impl Compatibility {
    /// The result reported for a pair that never reached L2.
    pub fn zero() -> Self {
        Self {
            score: 0,
            dimensions: DimensionVector::uniform(0.0),
        }
    }
}

/// Similarity of two values on one axis, in `[0, 1]`.
#[inline]
pub fn axis_compatibility(a: f64, b: f64) -> f64 {
    1.0 - (a - b).abs() / 100.0
}

pub fn compatibility(
    candidate: &DimensionVector,
    target: &DimensionVector,
    consistency: f64,
) -> Compatibility {
    let mut dimensions = DimensionVector::uniform(0.0);
    let mut total = 0.0;

    for dim in Dimension::ALL {
        let compat = axis_compatibility(candidate[dim], target[dim]);
        dimensions.set(dim, round_to(compat * 100.0, 2));
        total += compat;
    }

    let raw_avg = total / DIMENSION_COUNT as f64;
    let discounted = raw_avg * consistency;
    let score = (discounted * 100.0).round_ties_even().clamp(0.0, 100.0) as u8;

    Compatibility { score, dimensions }
}
