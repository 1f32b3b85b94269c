use std::fmt;

use serde::{Deserialize, Serialize};

/// Character class an item is restricted to, derived from its type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassTag {
    Warlock,
    Titan,
    Hunter,
    NoClass,
}

impl ClassTag {
    pub const ALL: [ClassTag; 4] = [Self::Warlock, Self::Titan, Self::Hunter, Self::NoClass];

    // Tested in order; the first substring found wins.
    const MATCH_ORDER: [(&'static str, ClassTag); 3] = [
        ("warlock", Self::Warlock),
        ("titan", Self::Titan),
        ("hunter", Self::Hunter),
    ];

    pub fn classify(type_label: &str) -> Self {
        let label = type_label.to_lowercase();
        Self::MATCH_ORDER
            .iter()
            .find(|(needle, _)| label.contains(*needle))
            .map(|&(_, tag)| tag)
            .unwrap_or(Self::NoClass)
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Warlock => "warlock",
            Self::Titan => "titan",
            Self::Hunter => "hunter",
            Self::NoClass => "noclass",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for ClassTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a free-text item type label such as `"Warlock Helmet"`.
pub fn classify(type_label: &str) -> ClassTag {
    ClassTag::classify(type_label)
}
