//! Text normalization.
//!
//! Canonicalizes raw page or user text so that incidental formatting
//! (navigation boilerplate, quotation marks, dash variants, punctuation
//! spacing) does not defeat exact word-run matching.
//!
//! One pass of the pipeline runs, in order:
//!
//! 1. boilerplate phrases, boilerplate patterns, kicker labels
//! 2. quoted spans
//! 3. dash unification, sentence spacing, comma and colon removal
//! 4. whitespace collapse
//! 5. duplicate-passage suppression and trailing-headline trimming (optional)
//!
//! [`Normalizer::normalize`] repeats the pass until the text stops changing,
//! so normalizing already-normalized text is a no-op.
//!
//! # Example
//!
//! ```
//! use verbatim_core::normalize::normalize;
//!
//! let text = "Lesen Sie mehr\nHe said \"not my words\", then left.Later he returned.";
//! assert_eq!(normalize(text), "He said then left. Later he returned.");
//! ```

mod duplicates;
mod quotes;
pub mod rules;

use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::NormalizeConfig;
use crate::error::{RuleError, RuleResult};

pub use rules::{
    DEFAULT_BOILERPLATE_PATTERNS, DEFAULT_BOILERPLATE_PHRASES, DEFAULT_MIN_DUPLICATE_CHARS,
    QuoteStyle, default_quote_styles,
};

/// Sentence punctuation glued to the next sentence's capital.
static SENTENCE_GLUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])(\p{Lu})").expect("valid regex"));

static KICKER_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(rules::KICKER_LABEL_PATTERN).expect("valid regex"));

static TRAILING_HEADLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(rules::TRAILING_HEADLINES_PATTERN).expect("valid regex"));

static DEFAULT_NORMALIZER: LazyLock<Normalizer> = LazyLock::new(Normalizer::default);

/// Normalize `text` with the built-in rule set.
///
/// Empty or whitespace-only input yields an empty string.
pub fn normalize(text: &str) -> String {
    DEFAULT_NORMALIZER.normalize(text)
}

/// A compiled normalization rule set.
#[derive(Debug, Clone)]
pub struct Normalizer {
    phrases: Option<AhoCorasick>,
    phrase_count: usize,
    patterns: Vec<Regex>,
    strip_kicker_labels: bool,
    quote_styles: Vec<QuoteStyle>,
    collapse_duplicates: bool,
    min_duplicate_chars: usize,
    trim_trailing_headlines: bool,
}

/// Description of an active rule set, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleSummary {
    /// Number of literal boilerplate phrases.
    pub boilerplate_phrases: usize,
    /// Number of boilerplate regular expressions.
    pub boilerplate_patterns: usize,
    /// Whether section labels such as "Panorama:" are dropped.
    pub strip_kicker_labels: bool,
    /// Names of the quote styles whose spans are removed (empty when disabled).
    pub quote_styles: Vec<String>,
    /// Whether immediately repeated passages are collapsed.
    pub collapse_duplicates: bool,
    /// Minimum passage length, in characters, for duplicate collapsing.
    pub min_duplicate_chars: usize,
    /// Whether trailing headline lists are trimmed.
    pub trim_trailing_headlines: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_config(&NormalizeConfig::default()).expect("built-in rules compile")
    }
}

impl Normalizer {
    /// Compile a rule set from configuration.
    ///
    /// Phrase and pattern lists replace the built-in ones when set; the
    /// `extra_*` lists are appended either way.
    pub fn from_config(config: &NormalizeConfig) -> RuleResult<Self> {
        let phrases: Vec<String> = config
            .boilerplate_phrases
            .clone()
            .unwrap_or_else(|| to_owned(DEFAULT_BOILERPLATE_PHRASES))
            .into_iter()
            .chain(config.extra_boilerplate_phrases.iter().cloned())
            .filter(|p| !p.trim().is_empty())
            .collect();

        let phrase_matcher = if phrases.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .match_kind(MatchKind::LeftmostLongest)
                    .build(&phrases)?,
            )
        };

        let patterns = config
            .boilerplate_patterns
            .clone()
            .unwrap_or_else(|| to_owned(DEFAULT_BOILERPLATE_PATTERNS))
            .into_iter()
            .chain(config.extra_boilerplate_patterns.iter().cloned())
            .map(|pattern| {
                Regex::new(&pattern).map_err(|source| RuleError::InvalidPattern { pattern, source })
            })
            .collect::<RuleResult<Vec<_>>>()?;

        let quote_styles = if config.strip_quotes {
            let styles = config
                .quote_styles
                .clone()
                .unwrap_or_else(default_quote_styles);
            for style in &styles {
                style.validate()?;
            }
            styles
        } else {
            Vec::new()
        };

        tracing::debug!(
            phrases = phrases.len(),
            patterns = patterns.len(),
            quote_styles = quote_styles.len(),
            "normalizer compiled"
        );

        Ok(Self {
            phrases: phrase_matcher,
            phrase_count: phrases.len(),
            patterns,
            strip_kicker_labels: config.strip_kicker_labels,
            quote_styles,
            collapse_duplicates: config.collapse_duplicates,
            min_duplicate_chars: config.min_duplicate_chars,
            trim_trailing_headlines: config.trim_trailing_headlines,
        })
    }

    /// Normalize `text`, re-running the pipeline until it settles.
    ///
    /// Every pass that changes more than whitespace removes at least one
    /// visible character, so the loop ends after at most one pass per
    /// visible character of the input.
    #[tracing::instrument(skip_all, fields(input_len = text.len()))]
    pub fn normalize(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let mut current = self.pass(text);
        let mut visible = visible_chars(&current);
        let mut passes = 1;
        loop {
            let next = self.pass(&current);
            passes += 1;
            let next_visible = visible_chars(&next);
            let settled = next == current || next_visible >= visible;
            current = next;
            visible = next_visible;
            if settled {
                break;
            }
        }

        tracing::trace!(passes, output_len = current.len(), "normalized");
        current
    }

    /// Summarize the active rules.
    pub fn rules(&self) -> RuleSummary {
        RuleSummary {
            boilerplate_phrases: self.phrase_count,
            boilerplate_patterns: self.patterns.len(),
            strip_kicker_labels: self.strip_kicker_labels,
            quote_styles: self.quote_styles.iter().map(|s| s.name.clone()).collect(),
            collapse_duplicates: self.collapse_duplicates,
            min_duplicate_chars: self.min_duplicate_chars,
            trim_trailing_headlines: self.trim_trailing_headlines,
        }
    }

    fn pass(&self, text: &str) -> String {
        let mut text = self.remove_phrases(text);
        for pattern in &self.patterns {
            text = pattern.replace_all(&text, "").into_owned();
        }
        if self.strip_kicker_labels {
            text = KICKER_LABEL.replace_all(&text, "${1}${2}").into_owned();
        }

        text = quotes::strip_quoted(&text, &self.quote_styles);

        text = text.replace(rules::is_dash, "-");
        text = SENTENCE_GLUE.replace_all(&text, "$1 $2").into_owned();
        text = text.replace([',', ':'], " ");

        let mut text = collapse_whitespace(&text);

        if self.collapse_duplicates {
            text = duplicates::collapse_repeated_passages(&text, self.min_duplicate_chars);
        }
        if self.trim_trailing_headlines {
            text = TRAILING_HEADLINES.replace(&text, "").into_owned();
        }

        collapse_whitespace(&text)
    }

    fn remove_phrases(&self, text: &str) -> String {
        let Some(ref matcher) = self.phrases else {
            return text.to_string();
        };

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in matcher.find_iter(text) {
            if !at_word_boundary(text, m.start(), m.end()) {
                continue;
            }
            out.push_str(&text[last..m.start()]);
            out.push(' ');
            last = m.end();
        }
        out.push_str(&text[last..]);
        out
    }
}

fn at_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

fn visible_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
