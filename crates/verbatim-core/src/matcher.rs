//! Greedy longest-match search for shared word runs.
//!
//! The candidate is split into words; the reference stays one string. From
//! each cursor position the matcher grows a run of candidate words, starting
//! at `min_words`, for as long as the space-joined run still occurs somewhere
//! in the reference. A run that reaches `min_words` is reported and its words
//! are consumed, so reported runs never overlap and come out in candidate
//! order.
//!
//! The containment test is a plain substring test, not a word-aligned one:
//! a run may begin or end inside a longer reference word ("own the" occurs in
//! "town the"). Normalized inputs make this rare, and it is kept on purpose.
//!
//! Each probe costs a substring search over the reference, so the worst case
//! is quadratic in candidate words times reference length. That is fine for
//! a handful of article-sized texts and not meant for corpus search.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default minimum run length, in words.
pub const DEFAULT_MIN_WORDS: usize = 5;

/// One verbatim run shared between a candidate and a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatchRecord {
    /// Index of the run's first word in the candidate.
    pub start_word_index: usize,
    /// Number of words in the run.
    pub length_in_words: usize,
    /// The run's words joined by single spaces.
    pub text: String,
    /// Label of the reference the run was found in (empty when unlabelled).
    pub source_label: String,
}

impl MatchRecord {
    /// Index one past the run's last word.
    pub const fn end_word_index(&self) -> usize {
        self.start_word_index + self.length_in_words
    }
}

/// Find the non-overlapping runs of at least `min_words` candidate words
/// that occur verbatim in `reference`.
///
/// Records come back ordered by start index with an empty `source_label`.
/// Empty input on either side yields no records. A `min_words` of zero is
/// treated as one.
pub fn find_matches(candidate: &str, reference: &str, min_words: usize) -> Vec<MatchRecord> {
    find_matches_labeled(candidate, reference, min_words, "")
}

/// [`find_matches`], stamping every record with `label`.
#[tracing::instrument(skip(candidate, reference), fields(candidate_len = candidate.len(), reference_len = reference.len()))]
pub fn find_matches_labeled(
    candidate: &str,
    reference: &str,
    min_words: usize,
    label: &str,
) -> Vec<MatchRecord> {
    let min_words = min_words.max(1);
    let words: Vec<&str> = candidate.split_whitespace().collect();
    if words.len() < min_words || reference.trim().is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    let mut run = String::new();
    let mut i = 0;

    while i + min_words <= words.len() {
        join_into(&mut run, &words[i..i + min_words]);
        if !reference.contains(run.as_str()) {
            i += 1;
            continue;
        }

        let mut length = min_words;
        let mut matched_len = run.len();
        while i + length < words.len() {
            run.push(' ');
            run.push_str(words[i + length]);
            if !reference.contains(run.as_str()) {
                break;
            }
            length += 1;
            matched_len = run.len();
        }
        run.truncate(matched_len);

        tracing::trace!(start = i, length, "run matched");
        matches.push(MatchRecord {
            start_word_index: i,
            length_in_words: length,
            text: run.clone(),
            source_label: label.to_string(),
        });
        i += length;
    }

    tracing::debug!(
        candidate_words = words.len(),
        matches = matches.len(),
        "matching finished"
    );
    matches
}

fn join_into(buf: &mut String, words: &[&str]) {
    buf.clear();
    for (n, word) in words.iter().enumerate() {
        if n > 0 {
            buf.push(' ');
        }
        buf.push_str(word);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    /// Checks the structural guarantees every result must satisfy.
    fn assert_well_formed(candidate: &str, reference: &str, min_words: usize, found: &[MatchRecord]) {
        let cand = words(candidate);
        for record in found {
            assert!(record.length_in_words >= min_words.max(1), "{record:?} too short");
            assert!(reference.contains(&record.text), "{record:?} not in reference");
            assert_eq!(
                cand[record.start_word_index..record.end_word_index()].join(" "),
                record.text
            );
        }
        for pair in found.windows(2) {
            assert!(pair[1].start_word_index >= pair[0].end_word_index(), "{pair:?} overlap");
        }
    }

    #[test]
    fn run_inside_longer_reference() {
        let candidate = "the quick brown fox jumps over the lazy dog";
        let reference = "a quick brown fox jumps over the lazy cat";
        let found = find_matches(candidate, reference, 5);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start_word_index, 1);
        assert_eq!(found[0].length_in_words, 7);
        assert_eq!(found[0].text, "quick brown fox jumps over the lazy");
        assert_eq!(found[0].source_label, "");
        assert_well_formed(candidate, reference, 5, &found);
    }

    #[test]
    fn nothing_shared() {
        let found = find_matches(
            "one two three four five six",
            "seven eight nine ten eleven twelve",
            5,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn shared_run_below_threshold() {
        let found = find_matches("a b c d x y", "a b c d z", 5);
        assert!(found.is_empty());
        let found = find_matches("a b c d x y", "a b c d z", 4);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn empty_inputs() {
        assert!(find_matches("", "anything at all here", 5).is_empty());
        assert!(find_matches("one two three four five", "", 5).is_empty());
        assert!(find_matches("   ", "   ", 1).is_empty());
    }

    #[test]
    fn candidate_shorter_than_threshold() {
        assert!(find_matches("one two three", "one two three", 5).is_empty());
    }

    #[test]
    fn whole_candidate_inside_reference() {
        let candidate = "every word of this sentence was copied";
        let reference = format!("Intro text. {candidate} and more text follows.");
        let found = find_matches(candidate, &reference, 5);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start_word_index, 0);
        assert_eq!(found[0].length_in_words, 7);
    }

    #[test]
    fn several_runs_in_order() {
        let candidate = "alpha beta gamma delta epsilon MINE MINE one two three four five six";
        let reference = "one two three four five six ... alpha beta gamma delta epsilon";
        let found = find_matches_labeled(candidate, reference, 5, "https://example.com/a");

        assert_eq!(found.len(), 2);
        assert_eq!((found[0].start_word_index, found[0].length_in_words), (0, 5));
        assert_eq!((found[1].start_word_index, found[1].length_in_words), (7, 6));
        assert!(found.iter().all(|m| m.source_label == "https://example.com/a"));
        assert_well_formed(candidate, reference, 5, &found);
    }

    #[test]
    fn repeated_candidate_runs_are_each_reported() {
        let run = "the same five words here";
        let candidate = format!("{run} and {run}");
        let found = find_matches(&candidate, run, 5);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].start_word_index, 0);
        assert_eq!(found[1].start_word_index, 6);
    }

    #[test]
    fn consumed_words_cannot_start_a_later_run() {
        // greedy: the first run swallows "c d e", leaving too few words after it
        let found = find_matches("a b c d e f g", "a b c d e | c d e f g", 3);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "a b c d e");
    }

    #[test]
    fn longest_run_is_kept() {
        let reference = "w1 w2 w3 w4 w5 w6 w7 w8";
        let found = find_matches("w1 w2 w3 w4 w5 w6 w7 w8", reference, 2);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].length_in_words, 8);
    }

    #[test]
    fn runs_can_straddle_reference_word_boundaries() {
        // "own" only occurs as the tail of "town"; containment still matches
        let found = find_matches(
            "own the old mill by the river",
            "the town the old mill by the river",
            5,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "own the old mill by the river");
    }

    #[test]
    fn irregular_candidate_spacing_is_joined_with_single_spaces() {
        let found = find_matches("one  two\tthree\n four five", "one two three four five", 5);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "one two three four five");
    }

    #[test]
    fn zero_threshold_behaves_like_one() {
        let found = find_matches("x shared y", "shared", 0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "shared");
        assert_eq!(found[0].length_in_words, 1);
    }

    #[test]
    fn properties_hold_on_mixed_text() {
        let reference = "It was the best of times it was the worst of times it was the age \
                         of wisdom it was the age of foolishness";
        let candidate = "Some say it was the best of times it was the worst of times for all \
                         and it was the age of wisdom it was the age of reason indeed";
        for min_words in 1..=8 {
            let found = find_matches(candidate, reference, min_words);
            assert_well_formed(candidate, reference, min_words, &found);
        }
    }
}
