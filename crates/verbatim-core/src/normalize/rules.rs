//! Built-in normalization rule data.
//!
//! The phrase and pattern lists target scraping artifacts of news sites:
//! German navigation labels (the sites this tool grew up on) plus their
//! English counterparts. Everything here can be replaced or extended through
//! [`NormalizeConfig`](crate::config::NormalizeConfig).

use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult};

/// Literal navigation phrases removed wherever they stand as whole words.
pub const DEFAULT_BOILERPLATE_PHRASES: &[&str] = &[
    "Artikel teilen mit",
    "Lesen Sie mehr",
    "zum Thema",
    "Panorama",
    "Kriminalität",
    "Read more",
    "Share this article",
    "Related articles",
    "Advertisement",
];

/// Regular expressions for navigation blocks and date/time stamps.
pub const DEFAULT_BOILERPLATE_PATTERNS: &[&str] = &[
    r"Home\s*News",
    r"Schlagzeilen\s*Alle",
    r"\b\d{2}\.\d{2}\.\d{4}\b",
    r"\b\d{4}-\d{2}-\d{2}\b",
    r"\b\d{2}:\d{2}\s+Uhr\b",
    r"\b\d{1,2}:\d{2}\s*(?:am|pm|AM|PM)\b",
];

/// A single-word section label ("Panorama: ") opening a line or sentence.
///
/// Group 1 keeps the preceding boundary, group 2 the capital that follows.
pub(crate) const KICKER_LABEL_PATTERN: &str = r"(?m)(^|[.!?]\s+)\p{Lu}\p{Ll}+:\s*(\p{Lu})";

/// A trailing chain of short capitalised fragments (related-headline lists).
///
/// Fragments never contain sentence punctuation, so a finished sentence is
/// never part of the chain.
pub(crate) const TRAILING_HEADLINES_PATTERN: &str = r"(?:\p{Lu}[^.!?]{10,50}(?:\s+|$))+$";

/// Shortest passage, in characters, that counts as a duplicated paragraph.
pub const DEFAULT_MIN_DUPLICATE_CHARS: usize = 50;

/// Characters folded to a plain hyphen.
pub(crate) const fn is_dash(c: char) -> bool {
    matches!(
        c,
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' | '\u{2212}'
    )
}

/// A family of quotation marks whose enclosed text is dropped.
///
/// Any mark in `open` pairs with the nearest following mark in `close`.
/// With `word_boundary` set, a mark only opens when it is not preceded by a
/// letter or digit and only closes when it is not followed by one, which
/// keeps apostrophes ("don't", "dogs'") from being read as quotes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuoteStyle {
    /// Short identifier used in diagnostics and `info` output.
    pub name: String,
    /// Marks that open a quoted span.
    pub open: String,
    /// Marks that close a quoted span.
    pub close: String,
    /// Require word boundaries around the marks.
    #[serde(default)]
    pub word_boundary: bool,
}

impl QuoteStyle {
    /// Create a style without word-boundary guarding.
    pub fn new(name: impl Into<String>, open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open: open.into(),
            close: close.into(),
            word_boundary: false,
        }
    }

    /// Require word boundaries around opening and closing marks.
    #[must_use]
    pub const fn with_word_boundary(mut self) -> Self {
        self.word_boundary = true;
        self
    }

    pub(crate) fn validate(&self) -> RuleResult<()> {
        if self.open.trim().is_empty() {
            return Err(RuleError::InvalidQuoteStyle {
                name: self.name.clone(),
                reason: "no opening marks",
            });
        }
        if self.close.trim().is_empty() {
            return Err(RuleError::InvalidQuoteStyle {
                name: self.name.clone(),
                reason: "no closing marks",
            });
        }
        Ok(())
    }

    /// Whether `chars[i]` opens a span of this style.
    pub(crate) fn opens_at(&self, chars: &[char], i: usize) -> bool {
        self.open.contains(chars[i])
            && (!self.word_boundary || !i.checked_sub(1).is_some_and(|p| chars[p].is_alphanumeric()))
    }

    /// Whether `chars[i]` closes a span of this style.
    pub(crate) fn closes_at(&self, chars: &[char], i: usize) -> bool {
        self.close.contains(chars[i])
            && (!self.word_boundary || !chars.get(i + 1).is_some_and(|c| c.is_alphanumeric()))
    }
}

/// The built-in quote families, in pairing priority order.
pub fn default_quote_styles() -> Vec<QuoteStyle> {
    vec![
        QuoteStyle::new(
            "double",
            "\"\u{201C}\u{201D}\u{201E}\u{201F}",
            "\"\u{201C}\u{201D}\u{201E}\u{201F}",
        ),
        QuoteStyle::new(
            "single-curly",
            "\u{2018}\u{2019}\u{201A}\u{201B}",
            "\u{2018}\u{2019}\u{201A}\u{201B}",
        )
        .with_word_boundary(),
        QuoteStyle::new("single-straight", "'", "'").with_word_boundary(),
        QuoteStyle::new("guillemets-inward", "\u{BB}", "\u{AB}"),
        QuoteStyle::new("guillemets-outward", "\u{AB}", "\u{BB}"),
        QuoteStyle::new("single-guillemets-inward", "\u{203A}", "\u{2039}"),
        QuoteStyle::new("single-guillemets-outward", "\u{2039}", "\u{203A}"),
    ]
}
