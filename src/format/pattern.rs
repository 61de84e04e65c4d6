//! Share-format placeholders and their prefix/suffix modifiers

use serde::{Deserialize, Serialize};

/// A token of the share-format mini language.
///
/// The set is closed: six metadata placeholders that substitute at render
/// time, the two quote markers that drive literal escaping, and the
/// two-character newline escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatPattern {
    /// `'` - opens or closes a literal escape span
    Quote,
    /// `''` - escape for a literal single quote
    DoubleQuote,
    /// `TI` - track title
    Title,
    /// `AR` - track artist
    Artist,
    /// `AL` - album name
    Album,
    /// `CO` - composer
    Composer,
    /// `PN` - player application name
    PlayerName,
    /// `SU` - external-service track URL
    ServiceUrl,
    /// `\n` - line break escape
    NewLine,
}

impl FormatPattern {
    /// The literal token string this pattern matches in a template.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Quote => "'",
            Self::DoubleQuote => "''",
            Self::Title => "TI",
            Self::Artist => "AR",
            Self::Album => "AL",
            Self::Composer => "CO",
            Self::PlayerName => "PN",
            Self::ServiceUrl => "SU",
            Self::NewLine => "\\n",
        }
    }

    /// All patterns, in split priority order.
    ///
    /// `''` must come before `'` so the two-character sequence wins at every
    /// position.
    pub const SPLIT_ORDER: [Self; 9] = [
        Self::DoubleQuote,
        Self::Quote,
        Self::Title,
        Self::Artist,
        Self::Album,
        Self::Composer,
        Self::PlayerName,
        Self::ServiceUrl,
        Self::NewLine,
    ];

    /// The patterns that substitute metadata and may carry a modifier.
    ///
    /// Excludes the quote markers and the newline escape.
    #[must_use]
    pub const fn replaceable() -> [Self; 6] {
        [
            Self::Title,
            Self::Artist,
            Self::Album,
            Self::Composer,
            Self::PlayerName,
            Self::ServiceUrl,
        ]
    }

    /// Look up the pattern matching a token string exactly.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::SPLIT_ORDER.into_iter().find(|p| p.token() == token)
    }
}

/// Prefix/suffix decoration applied around one placeholder's resolved value.
///
/// A modifier list may contain duplicate keys (nothing in the stored shape
/// forbids it); lookup honors only the first entry per key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatPatternModifier {
    /// The placeholder this modifier decorates
    #[serde(rename = "placeholder")]
    pub key: FormatPattern,

    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl FormatPatternModifier {
    /// Create a modifier for a placeholder.
    #[must_use]
    pub fn new(
        key: FormatPattern,
        prefix: Option<impl Into<String>>,
        suffix: Option<impl Into<String>>,
    ) -> Self {
        Self {
            key,
            prefix: prefix.map(Into::into),
            suffix: suffix.map(Into::into),
        }
    }
}

/// First-match-wins affix lookup: `(prefix, suffix)` for a placeholder,
/// empty strings when no modifier is registered or a side is unset.
#[must_use]
pub fn affixes(modifiers: &[FormatPatternModifier], key: FormatPattern) -> (&str, &str) {
    modifiers
        .iter()
        .find(|m| m.key == key)
        .map_or(("", ""), |m| {
            (
                m.prefix.as_deref().unwrap_or(""),
                m.suffix.as_deref().unwrap_or(""),
            )
        })
}
