//! Fan-out of one candidate over several sources.
//!
//! A [`ComparisonRequest`] carries everything a single comparison needs:
//! the raw candidate and the raw text of each source, as gathered by the
//! caller (files, pasted text, pages fetched elsewhere). Nothing survives
//! between requests.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::RuleResult;
use crate::matcher::{self, DEFAULT_MIN_WORDS, MatchRecord};
use crate::normalize::Normalizer;

/// Label given to sources typed or pasted in by hand.
pub const MANUAL_LABEL: &str = "manual entry";

/// A reference text and the label its matches are grouped under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Source {
    /// Where the text came from: a URL, a file path, or [`MANUAL_LABEL`].
    pub label: String,
    /// The raw, un-normalized text.
    pub text: String,
}

impl Source {
    /// Create a labelled source.
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Create a source for hand-entered text.
    pub fn manual(text: impl Into<String>) -> Self {
        Self::new(MANUAL_LABEL, text)
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Inputs for one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComparisonRequest {
    /// The raw text under suspicion.
    pub candidate: String,
    /// Reference texts, in display order.
    pub sources: Vec<Source>,
}

impl ComparisonRequest {
    /// Start a request for `candidate` with no sources yet.
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            sources: Vec::new(),
        }
    }

    /// Add a source.
    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }
}

/// Matches found in one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourceMatches {
    /// The source's label.
    pub label: String,
    /// Runs shared with the candidate, ordered by start index.
    pub matches: Vec<MatchRecord>,
    /// Total candidate words covered by `matches`.
    pub matched_words: usize,
    /// `matched_words` as a percentage of the candidate's words.
    pub coverage: f64,
}

/// Outcome of a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComparisonReport {
    /// Word count of the normalized candidate.
    pub candidate_words: usize,
    /// Minimum run length that was applied.
    pub min_words: usize,
    /// Sources with at least one match, in request order.
    pub sources: Vec<SourceMatches>,
    /// Labels of sources skipped because their text was blank.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl ComparisonReport {
    /// Matches recorded for `label`, if any.
    pub fn get(&self, label: &str) -> Option<&SourceMatches> {
        self.sources.iter().find(|s| s.label == label)
    }

    /// Whether any source shares a run with the candidate.
    pub fn has_matches(&self) -> bool {
        !self.sources.is_empty()
    }

    /// Number of match records across all sources.
    pub fn total_matches(&self) -> usize {
        self.sources.iter().map(|s| s.matches.len()).sum()
    }
}

/// Runs comparisons with a fixed rule set and threshold.
#[derive(Debug, Clone)]
pub struct Comparator {
    normalizer: Normalizer,
    min_words: usize,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(Normalizer::default(), DEFAULT_MIN_WORDS)
    }
}

impl Comparator {
    /// Create a comparator from a compiled normalizer and a run threshold.
    pub const fn new(normalizer: Normalizer, min_words: usize) -> Self {
        Self {
            normalizer,
            min_words,
        }
    }

    /// Build a comparator from loaded configuration.
    pub fn from_config(config: &Config) -> RuleResult<Self> {
        Ok(Self::new(
            Normalizer::from_config(&config.normalize)?,
            config.effective_min_words(),
        ))
    }

    /// Use a different run threshold.
    #[must_use]
    pub const fn with_min_words(mut self, min_words: usize) -> Self {
        self.min_words = min_words;
        self
    }

    /// The run threshold in effect.
    pub const fn min_words(&self) -> usize {
        self.min_words
    }

    /// The normalizer in effect.
    pub const fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Compare the candidate against every source.
    ///
    /// The candidate is normalized once. Blank sources are skipped; sources
    /// without matches are left out of the report. When two sources share a
    /// label, the later one's matches replace the earlier one's.
    #[tracing::instrument(skip_all, fields(sources = request.sources.len(), min_words = self.min_words))]
    pub fn compare(&self, request: &ComparisonRequest) -> ComparisonReport {
        let candidate = self.normalizer.normalize(&request.candidate);
        let candidate_words = candidate.split_whitespace().count();

        let mut report = ComparisonReport {
            candidate_words,
            min_words: self.min_words,
            sources: Vec::new(),
            skipped: Vec::new(),
        };

        for source in &request.sources {
            if source.is_blank() {
                tracing::debug!(label = %source.label, "skipping blank source");
                report.skipped.push(source.label.clone());
                continue;
            }

            let reference = self.normalizer.normalize(&source.text);
            let matches =
                matcher::find_matches_labeled(&candidate, &reference, self.min_words, &source.label);
            if matches.is_empty() {
                tracing::debug!(label = %source.label, "no shared runs");
                continue;
            }

            let entry = summarize(&source.label, matches, candidate_words);
            tracing::info!(
                label = %entry.label,
                matches = entry.matches.len(),
                matched_words = entry.matched_words,
                "shared runs found"
            );
            match report.sources.iter_mut().find(|s| s.label == entry.label) {
                Some(existing) => *existing = entry,
                None => report.sources.push(entry),
            }
        }

        report
    }
}

fn summarize(label: &str, matches: Vec<MatchRecord>, candidate_words: usize) -> SourceMatches {
    let matched_words: usize = matches.iter().map(|m| m.length_in_words).sum();
    let coverage = if candidate_words == 0 {
        0.0
    } else {
        matched_words as f64 * 100.0 / candidate_words as f64
    };
    SourceMatches {
        label: label.to_string(),
        matches,
        matched_words,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = "Police in the harbour district arrested two men on Friday night \
                           after a chase through the old town. Officers said the suspects had \
                           broken into a jewellery shop shortly before midnight.";

    #[test]
    fn verbatim_copy_is_found_and_labelled() {
        let candidate = "Yesterday police in the harbour district arrested two men on Friday night \
                         according to reports.";
        let request = ComparisonRequest::new(candidate)
            .with_source(Source::new("https://news.example/a", ARTICLE));

        let report = Comparator::default().compare(&request);

        assert!(report.has_matches());
        let found = report.get("https://news.example/a").unwrap();
        assert_eq!(found.matches.len(), 1);
        // "police" is lowercase here, so the run starts one word later
        assert_eq!(
            found.matches[0].text,
            "in the harbour district arrested two men on Friday night"
        );
        assert_eq!(found.matches[0].start_word_index, 2);
        assert_eq!(found.matches[0].source_label, "https://news.example/a");
        assert_eq!(found.matched_words, 10);
    }

    #[test]
    fn shared_run_in_short_sentences() {
        let request = ComparisonRequest::new("the quick brown fox jumps over the lazy dog")
            .with_source(Source::new("ref", "a quick brown fox jumps over the lazy cat"));
        let report = Comparator::default().compare(&request);

        let entry = report.get("ref").unwrap();
        assert_eq!(entry.matches.len(), 1);
        assert_eq!(entry.matches[0].start_word_index, 1);
        assert_eq!(entry.matches[0].length_in_words, 7);
    }

    #[test]
    fn unrelated_source_is_left_out() {
        let request = ComparisonRequest::new(ARTICLE)
            .with_source(Source::new("other", "A recipe for bread with flour water salt and yeast."));
        let report = Comparator::default().compare(&request);
        assert!(!report.has_matches());
        assert!(report.get("other").is_none());
        assert_eq!(report.total_matches(), 0);
    }

    #[test]
    fn blank_sources_are_skipped() {
        let request = ComparisonRequest::new(ARTICLE)
            .with_source(Source::new("https://empty.example", "  \n "))
            .with_source(Source::manual(ARTICLE));
        let report = Comparator::default().compare(&request);

        assert_eq!(report.skipped, vec!["https://empty.example"]);
        assert!(report.get(MANUAL_LABEL).is_some());
    }

    #[test]
    fn sources_keep_request_order() {
        let request = ComparisonRequest::new(ARTICLE)
            .with_source(Source::new("second", ARTICLE))
            .with_source(Source::new("first", ARTICLE));
        let report = Comparator::default().compare(&request);
        let labels: Vec<_> = report.sources.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["second", "first"]);
    }

    #[test]
    fn later_source_with_same_label_replaces_earlier() {
        let request = ComparisonRequest::new(ARTICLE)
            .with_source(Source::manual(ARTICLE))
            .with_source(Source::manual("Officers said the suspects had broken into a jewellery shop"));
        let report = Comparator::default().compare(&request);

        assert_eq!(report.sources.len(), 1);
        let entry = report.get(MANUAL_LABEL).unwrap();
        assert_eq!(
            entry.matches[0].text,
            "Officers said the suspects had broken into a jewellery shop"
        );
    }

    #[test]
    fn full_copy_has_full_coverage() {
        let request = ComparisonRequest::new(ARTICLE).with_source(Source::manual(ARTICLE));
        let report = Comparator::default().compare(&request);
        let entry = report.get(MANUAL_LABEL).unwrap();
        assert_eq!(entry.matches.len(), 1);
        assert_eq!(entry.matched_words, report.candidate_words);
        assert!((entry.coverage - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quoted_candidate_yields_nothing() {
        let quote = "this is a direct quote from elsewhere";
        let candidate = format!("He said \"{quote}\"");
        let request =
            ComparisonRequest::new(candidate).with_source(Source::new("ref", format!("{quote} and more")));
        let report = Comparator::default().compare(&request);

        assert_eq!(report.candidate_words, 2);
        assert!(!report.has_matches());
    }

    #[test]
    fn doubled_reference_yields_one_record_per_run() {
        let reference = format!("{ARTICLE} {ARTICLE}");
        let comparator = Comparator::default();
        let normalizer = comparator.normalizer();
        assert_eq!(normalizer.normalize(&reference), normalizer.normalize(ARTICLE));

        let request = ComparisonRequest::new(ARTICLE).with_source(Source::new("dup", reference));
        let report = comparator.compare(&request);

        let entry = report.get("dup").unwrap();
        assert_eq!(entry.matches.len(), 1);
        assert_eq!(entry.matches[0].start_word_index, 0);
        assert_eq!(entry.matches[0].length_in_words, report.candidate_words);
    }

    #[test]
    fn doubled_reference_survives_without_collapsing() {
        let config = crate::config::NormalizeConfig {
            collapse_duplicates: false,
            ..crate::config::NormalizeConfig::default()
        };
        let normalizer = Normalizer::from_config(&config).unwrap();
        let reference = format!("{ARTICLE} {ARTICLE}");
        let single = normalizer.normalize(ARTICLE).split_whitespace().count();
        let doubled = normalizer.normalize(&reference).split_whitespace().count();
        assert_eq!(doubled, 2 * single);

        let request = ComparisonRequest::new(ARTICLE).with_source(Source::new("dup", reference));
        let report = Comparator::new(normalizer, DEFAULT_MIN_WORDS).compare(&request);
        assert_eq!(report.get("dup").unwrap().matches.len(), 1);
    }

    #[test]
    fn normalization_bridges_formatting_differences() {
        let candidate = "The mayor said the plan,which was drafted in 2019,would cost \
                         four million euros.It passed.";
        let reference = "Home News 12.03.2024 The mayor said the plan which was drafted in \
                         2019 would cost four million euros. It passed. Lesen Sie mehr";
        let request = ComparisonRequest::new(candidate).with_source(Source::new("r", reference));
        let report = Comparator::default().compare(&request);

        let entry = report.get("r").unwrap();
        assert_eq!(entry.matches.len(), 1);
        assert_eq!(entry.matched_words, report.candidate_words);
    }

    #[test]
    fn threshold_is_configurable() {
        let request = ComparisonRequest::new("one two three four and more")
            .with_source(Source::manual("one two three four"));
        assert!(!Comparator::default().compare(&request).has_matches());
        assert!(
            Comparator::default()
                .with_min_words(4)
                .compare(&request)
                .has_matches()
        );
    }

    #[test]
    fn from_config_applies_threshold_and_rules() {
        let mut config = Config {
            min_words: Some(3),
            ..Config::default()
        };
        config.normalize.strip_quotes = false;
        let comparator = Comparator::from_config(&config).unwrap();

        assert_eq!(comparator.min_words(), 3);
        assert!(comparator.normalizer().rules().quote_styles.is_empty());
    }

    #[test]
    fn report_serializes_with_labels() {
        let request = ComparisonRequest::new(ARTICLE).with_source(Source::manual(ARTICLE));
        let report = Comparator::default().compare(&request);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["sources"][0]["label"], MANUAL_LABEL);
        assert_eq!(json["sources"][0]["matches"][0]["start_word_index"], 0);
        assert!(json.get("skipped").is_none());
    }
}
