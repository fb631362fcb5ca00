use std::{fmt::Display, str::FromStr};

use clap::ValueEnum;

/// Closed set of tags a check-in can carry. The persisted form is the glyph
/// itself rather than the variant name, matching the on-disk data layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmojiTag {
    Clock,
    Note,
    Pizza,
    Rocket,
    Check,
}

impl EmojiTag {
    pub const ALL: [EmojiTag; 5] = [
        EmojiTag::Clock,
        EmojiTag::Note,
        EmojiTag::Pizza,
        EmojiTag::Rocket,
        EmojiTag::Check,
    ];

    /// Assigned to records loaded from older persisted data that predates
    /// tags. Intentionally not the same as the selection default.
    pub const LOAD_DEFAULT: EmojiTag = EmojiTag::Note;

    pub fn glyph(self) -> &'static str {
        match self {
            EmojiTag::Clock => "⏰",
            EmojiTag::Note => "📝",
            EmojiTag::Pizza => "🍕",
            EmojiTag::Rocket => "🚀",
            EmojiTag::Check => "✅",
        }
    }

    pub fn from_glyph(glyph: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.glyph() == glyph)
    }
}

impl Display for EmojiTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl FromStr for EmojiTag {
    type Err = String;

    /// Accepts either the glyph or the tag name, so both `s 🚀` and
    /// `s rocket` work in a watch session.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmojiTag::from_glyph(s)
            .or_else(|| <EmojiTag as ValueEnum>::from_str(s, true).ok())
            .ok_or_else(|| format!("unknown tag '{s}'"))
    }
}

/// Tag that the next recorded check-in will carry. Selecting a tag never
/// touches already recorded check-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    current: EmojiTag,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            current: EmojiTag::Clock,
        }
    }
}

impl SelectionState {
    pub fn current(&self) -> EmojiTag {
        self.current
    }

    pub fn select(&mut self, tag: EmojiTag) {
        self.current = tag;
    }
}
