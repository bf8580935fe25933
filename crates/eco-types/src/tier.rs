use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Reward band earned by cumulative recycling.
///
/// Variants are declared lowest first so that the derived `Ord` matches the
/// progression. A tier is always derived from a bottle count; see the reward
/// engine's threshold table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Novice,
    Explorer,
    Guardian,
    Master,
}

impl Tier {
    /// All tiers, lowest first.
    pub const ALL: [Tier; 4] = [Tier::Novice, Tier::Explorer, Tier::Guardian, Tier::Master];

    /// Short label, e.g. `"Explorer"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Novice => "Novice",
            Self::Explorer => "Explorer",
            Self::Guardian => "Guardian",
            Self::Master => "Master",
        }
    }

    /// Display title shown on the dashboard.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Novice => "Novice Recycler",
            Self::Explorer => "Environmental Explorer",
            Self::Guardian => "Guayas Guardian",
            Self::Master => "Recycling Master",
        }
    }

    /// The tier immediately above this one.
    pub fn next(&self) -> Option<Tier> {
        match self {
            Self::Novice => Some(Self::Explorer),
            Self::Explorer => Some(Self::Guardian),
            Self::Guardian => Some(Self::Master),
            Self::Master => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tier {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypeError::UnknownTier(s.to_string()))
    }
}
