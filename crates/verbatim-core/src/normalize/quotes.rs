//! Quoted-span removal.

use super::rules::QuoteStyle;

/// Drop every quoted span, marks included, replacing it with a space.
///
/// Scans left to right. At each position the styles are tried in order; the
/// first style that opens here and has a closing mark further on claims the
/// span up to that nearest closing mark. Spans never nest. A mark with no
/// partner is kept as ordinary text.
pub(crate) fn strip_quoted(text: &str, styles: &[QuoteStyle]) -> String {
    if styles.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    'scan: while i < chars.len() {
        for style in styles {
            if style.opens_at(&chars, i)
                && let Some(end) = find_close(&chars, i, style)
            {
                out.push(' ');
                i = end + 1;
                continue 'scan;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

fn find_close(chars: &[char], open: usize, style: &QuoteStyle) -> Option<usize> {
    (open + 1..chars.len()).find(|&j| style.closes_at(chars, j))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::rules::default_quote_styles;

    fn strip(text: &str) -> String {
        strip_quoted(text, &default_quote_styles())
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn straight_double_quotes() {
        assert_eq!(strip(r#"He said "hello there" and left"#), "He said and left");
    }

    #[test]
    fn curly_and_low_quotes_pair_with_each_other() {
        assert_eq!(strip("Er sagte \u{201E}gute Nacht\u{201C} und ging"), "Er sagte und ging");
        assert_eq!(strip("She said \u{201C}fine\u{201D} twice"), "She said twice");
    }

    #[test]
    fn guillemets_both_directions() {
        assert_eq!(strip("a \u{BB}zitat\u{AB} b"), "a b");
        assert_eq!(strip("a \u{AB}citation\u{BB} b"), "a b");
        assert_eq!(strip("a \u{203A}x\u{2039} b \u{2039}y\u{203A} c"), "a b c");
    }

    #[test]
    fn apostrophes_survive() {
        assert_eq!(
            strip("It's the dogs' bowl and we don't mind"),
            "It's the dogs' bowl and we don't mind"
        );
    }

    #[test]
    fn single_quotes_at_word_boundaries_are_removed() {
        assert_eq!(strip("the so-called 'expert view' won"), "the so-called won");
    }

    #[test]
    fn first_opener_pairs_with_nearest_closer() {
        assert_eq!(strip(r#"a "b" c "d" e"#), "a c e");
    }

    #[test]
    fn unmatched_mark_is_kept() {
        assert_eq!(strip(r#"an "unbalanced quote"#), r#"an "unbalanced quote"#);
    }

    #[test]
    fn spans_cross_line_breaks() {
        assert_eq!(strip("one \"two\nthree\" four"), "one four");
    }

    #[test]
    fn no_styles_is_identity() {
        assert_eq!(strip_quoted(r#"keep "this""#, &[]), r#"keep "this""#);
    }
}
