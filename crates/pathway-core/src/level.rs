//! The learner skill scale.
//!
//! Paths and learners share the same three-step scale. Each level has a
//! numeric value (Beginner = 0, Intermediate = 1, Advanced = 2) used for
//! ordering, distance, and appropriateness checks. A path with no level
//! counts as Beginner wherever a numeric value is needed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Skill level of a learning path or a learner.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Level {
    /// Entry level.
    #[default]
    #[serde(alias = "beginner")]
    Beginner,
    /// Middle level.
    #[serde(alias = "intermediate")]
    Intermediate,
    /// Top level.
    #[serde(alias = "advanced")]
    Advanced,
}

impl Level {
    /// All levels in ascending order.
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// Numeric value of the level.
    pub fn value(self) -> u8 {
        match self {
            Level::Beginner => 0,
            Level::Intermediate => 1,
            Level::Advanced => 2,
        }
    }

    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }

    /// Parse user input, falling back to Beginner for anything unrecognised.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Whether a path at `path_level` is appropriate for a learner at this level.
    ///
    /// Paths at or below the learner's level are appropriate, plus one level
    /// above it.
    pub fn admits(self, path_level: Option<Level>) -> bool {
        level_value(path_level) <= self.value() + 1
    }
}

/// Numeric value of an optional level; missing levels count as Beginner.
pub fn level_value(level: Option<Level>) -> u8 {
    level.map_or(0, Level::value)
}

/// Absolute distance between two optional levels.
pub fn level_distance(a: Option<Level>, b: Option<Level>) -> u8 {
    level_value(a).abs_diff(level_value(b))
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(Error::invalid_data(format!("Unknown level: {other}"))),
        }
    }
}
