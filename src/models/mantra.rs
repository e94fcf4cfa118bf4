use serde::{Deserialize, Serialize};

/// A mantra definition from the static catalog.
///
/// Catalog entries are **immutable**—they are seeded once at startup and never
/// change at runtime. Each entry carries a repetition goal (`target_count`)
/// and a default audio accompaniment; a session may override the audio with a
/// caller-supplied resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mantra {
    /// Stable slug, e.g. `"gayatri-mantra"`.
    pub id: String,
    pub name: String,
    /// The recited phrase.
    pub text: String,
    pub description: String,
    /// Repetition goal for a complete session. Always positive.
    pub target_count: u32,
    /// Default playable resource.
    pub audio_url: String,
    pub category: MantraCategory,
}

/// The closed set of catalog categories used for filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MantraCategory {
    Shiva,
    Vishnu,
    Devi,
    Ganesha,
    Hanuman,
    Vedic,
}

impl MantraCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shiva => "shiva",
            Self::Vishnu => "vishnu",
            Self::Devi => "devi",
            Self::Ganesha => "ganesha",
            Self::Hanuman => "hanuman",
            Self::Vedic => "vedic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "shiva" => Some(Self::Shiva),
            "vishnu" => Some(Self::Vishnu),
            "devi" => Some(Self::Devi),
            "ganesha" => Some(Self::Ganesha),
            "hanuman" => Some(Self::Hanuman),
            "vedic" => Some(Self::Vedic),
            _ => None,
        }
    }
}

/// A category filter with the `"all"` sentinel meaning no filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(MantraCategory),
}

impl CategoryFilter {
    /// Parse a filter string. `"all"` is the sentinel; anything else must be
    /// a known category name.
    pub fn from_str(s: &str) -> Option<Self> {
        if s == "all" {
            return Some(Self::All);
        }
        MantraCategory::from_str(s).map(Self::Only)
    }

    pub fn matches(&self, category: MantraCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => *c == category,
        }
    }
}
