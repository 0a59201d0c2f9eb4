//! The eight-axis DNA model shared by individuals and organizations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::error::Error;

/// Number of axes in every profile.
pub const DIMENSION_COUNT: usize = 8;

/// Lower bound of every axis.
pub const MIN_SCORE: f64 = 0.0;

/// Upper bound of every axis.
pub const MAX_SCORE: f64 = 100.0;

/// Value used for an axis nobody said anything about.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// One behavioral axis.
///
/// Serialized with the short keys used by the scoring tables and persisted
/// profile rows (`pace`, `collab`, `decision`, `expression`, `unc`, `growth`,
/// `motiv`, `execution`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "pace")]
    Pace,
    #[serde(rename = "collab")]
    Collaboration,
    #[serde(rename = "decision")]
    Decision,
    #[serde(rename = "expression")]
    Expression,
    #[serde(rename = "unc")]
    Uncertainty,
    #[serde(rename = "growth")]
    Growth,
    #[serde(rename = "motiv")]
    Motivation,
    #[serde(rename = "execution")]
    Execution,
}

impl Dimension {
    /// All axes in canonical order.
    pub const ALL: [Dimension; DIMENSION_COUNT] = [
        Dimension::Pace,
        Dimension::Collaboration,
        Dimension::Decision,
        Dimension::Expression,
        Dimension::Uncertainty,
        Dimension::Growth,
        Dimension::Motivation,
        Dimension::Execution,
    ];

    /// Position of this axis in [`Dimension::ALL`].
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short key used in data assets and serialized profiles.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Pace => "pace",
            Dimension::Collaboration => "collab",
            Dimension::Decision => "decision",
            Dimension::Expression => "expression",
            Dimension::Uncertainty => "unc",
            Dimension::Growth => "growth",
            Dimension::Motivation => "motiv",
            Dimension::Execution => "execution",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pace" => Ok(Dimension::Pace),
            "collab" | "collaboration" => Ok(Dimension::Collaboration),
            "decision" => Ok(Dimension::Decision),
            "expression" => Ok(Dimension::Expression),
            "unc" | "uncertainty" => Ok(Dimension::Uncertainty),
            "growth" => Ok(Dimension::Growth),
            "motiv" | "motivation" => Ok(Dimension::Motivation),
            "execution" => Ok(Dimension::Execution),
            other => Err(Error::ScoringTable(format!("unknown dimension '{}'", other))),
        }
    }
}

/// A fully populated eight-axis profile, every axis in `[0, 100]`.
///
/// Serializes as an 8-key float mapping; deserialization requires all eight
/// keys and clamps out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "DimensionMap", into = "DimensionMap")]
pub struct DimensionVector {
    values: [f64; DIMENSION_COUNT],
}

impl DimensionVector {
    #[must_use]
    pub fn new(values: [f64; DIMENSION_COUNT]) -> Self {
        Self::from_fn(|d| values[d.index()])
    }

    /// Every axis at the neutral midpoint.
    #[inline]
    #[must_use]
    pub fn neutral() -> Self {
        Self::uniform(NEUTRAL_SCORE)
    }

    #[inline]
    #[must_use]
    pub fn uniform(value: f64) -> Self {
        Self::new([value; DIMENSION_COUNT])
    }

    /// Build a vector by evaluating `f` for each axis in canonical order.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Dimension) -> f64,
    {
        let mut values = [NEUTRAL_SCORE; DIMENSION_COUNT];
        for dim in Dimension::ALL {
            values[dim.index()] = clamp_score(f(dim));
        }
        Self { values }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, dim: Dimension) -> f64 {
        self.values[dim.index()]
    }

    #[inline]
    pub fn set(&mut self, dim: Dimension, value: f64) {
        self.values[dim.index()] = clamp_score(value);
    }

    /// Copy with one axis replaced.
    #[must_use]
    pub fn with(mut self, dim: Dimension, value: f64) -> Self {
        self.set(dim, value);
        self
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> &[f64; DIMENSION_COUNT] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

impl Default for DimensionVector {
    fn default() -> Self {
        Self::neutral()
    }
}

impl Index<Dimension> for DimensionVector {
    type Output = f64;

    fn index(&self, dim: Dimension) -> &f64 {
        &self.values[dim.index()]
    }
}

#[inline]
fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        NEUTRAL_SCORE
    } else {
        value.clamp(MIN_SCORE, MAX_SCORE)
    }
}

/// Wire shape of [`DimensionVector`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct DimensionMap {
    pace: f64,
    collab: f64,
    decision: f64,
    expression: f64,
    unc: f64,
    growth: f64,
    motiv: f64,
    execution: f64,
}

impl From<DimensionMap> for DimensionVector {
    fn from(m: DimensionMap) -> Self {
        DimensionVector::new([
            m.pace,
            m.collab,
            m.decision,
            m.expression,
            m.unc,
            m.growth,
            m.motiv,
            m.execution,
        ])
    }
}

impl From<DimensionVector> for DimensionMap {
    fn from(v: DimensionVector) -> Self {
        DimensionMap {
            pace: v.get(Dimension::Pace),
            collab: v.get(Dimension::Collaboration),
            decision: v.get(Dimension::Decision),
            expression: v.get(Dimension::Expression),
            unc: v.get(Dimension::Uncertainty),
            growth: v.get(Dimension::Growth),
            motiv: v.get(Dimension::Motivation),
            execution: v.get(Dimension::Execution),
        }
    }
}
