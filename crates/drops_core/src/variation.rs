use std::fmt;

use serde::{Deserialize, Serialize};

/// Which catalog collection a view is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variation {
    Raid,
    Strike,
}

impl Variation {
    pub fn title(&self) -> &'static str {
        match *self {
            Self::Raid => "Raids",
            Self::Strike => "All Activities",
        }
    }

    /// Published location of the combined catalog, if one exists for this variation.
    pub fn data_url(&self) -> Option<&'static str> {
        match *self {
            Self::Raid => Some("https://destiny.plumbing/en/collections/combinedRaidDrops.json"),
            Self::Strike => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Raid => "raid",
            Self::Strike => "strike",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "raid" | "raids" => Some(Self::Raid),
            "strike" | "strikes" => Some(Self::Strike),
            _ => None,
        }
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
