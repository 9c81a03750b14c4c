//! Duplicate-passage suppression.
//!
//! Some CMS templates print the lead paragraph twice in a row. A passage of
//! at least `min_chars` characters that is immediately followed by one or
//! more copies of itself is kept once. Passages are whole words; the input
//! is expected to be whitespace-collapsed already.

use std::collections::HashMap;

/// Collapse immediately repeated passages to a single occurrence.
///
/// At each word position the shortest qualifying passage that repeats is
/// chosen, then every consecutive copy of it is dropped.
pub(crate) fn collapse_repeated_passages(text: &str, min_chars: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 2 {
        return words.join(" ");
    }

    // prefix[k] = total characters in words[..k], separators excluded
    let mut prefix = Vec::with_capacity(words.len() + 1);
    prefix.push(0usize);
    for word in &words {
        prefix.push(prefix[prefix.len() - 1] + word.chars().count());
    }

    // a repeat of length `len` at `start` needs words[start + len] == words[start]
    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
    for (n, word) in words.iter().enumerate() {
        positions.entry(*word).or_default().push(n);
    }

    let mut kept: Vec<&str> = Vec::with_capacity(words.len());
    let mut i = 0;

    while i < words.len() {
        match shortest_repeat(&words, &prefix, &positions[words[i]], i, min_chars) {
            Some(len) => {
                let passage = &words[i..i + len];
                kept.extend_from_slice(passage);
                let mut next = i + len;
                while next + len <= words.len() && &words[next..next + len] == passage {
                    next += len;
                }
                i = next;
            }
            None => {
                kept.push(words[i]);
                i += 1;
            }
        }
    }

    kept.join(" ")
}

fn shortest_repeat(
    words: &[&str],
    prefix: &[usize],
    same_word_at: &[usize],
    start: usize,
    min_chars: usize,
) -> Option<usize> {
    let max_len = (words.len() - start) / 2;
    let after = same_word_at.partition_point(|&p| p <= start);
    same_word_at[after..]
        .iter()
        .map(|&p| p - start)
        .take_while(|&len| len <= max_len)
        .find(|&len| {
            let chars = prefix[start + len] - prefix[start] + (len - 1);
            chars >= min_chars && words[start..start + len] == words[start + len..start + 2 * len]
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAD: &str = "The city council approved the new budget after a long debate on Tuesday";

    #[test]
    fn doubled_lead_paragraph_is_kept_once() {
        let text = format!("{LEAD} {LEAD} Later the mayor spoke.");
        assert_eq!(
            collapse_repeated_passages(&text, 50),
            format!("{LEAD} Later the mayor spoke.")
        );
    }

    #[test]
    fn tripled_passage_is_kept_once() {
        let text = format!("Intro {LEAD} {LEAD} {LEAD}");
        assert_eq!(collapse_repeated_passages(&text, 50), format!("Intro {LEAD}"));
    }

    #[test]
    fn short_repeats_are_left_alone() {
        let text = "that that is is what it is";
        assert_eq!(collapse_repeated_passages(text, 50), text);
    }

    #[test]
    fn non_adjacent_repeats_are_left_alone() {
        let text = format!("{LEAD} and then {LEAD}");
        assert_eq!(collapse_repeated_passages(&text, 50), text);
    }

    #[test]
    fn empty_and_single_word() {
        assert_eq!(collapse_repeated_passages("", 50), "");
        assert_eq!(collapse_repeated_passages("word", 50), "word");
    }

    #[test]
    fn threshold_counts_separators() {
        // "ab cd" is five characters including the space
        assert_eq!(collapse_repeated_passages("ab cd ab cd", 5), "ab cd");
        assert_eq!(collapse_repeated_passages("ab cd ab cd", 6), "ab cd ab cd");
    }
}
