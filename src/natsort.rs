//! Natural-order filename sorting.
//!
//! Directory listings come back in arbitrary order, and lexical sort puts
//! `page10.pdf` before `page2.pdf`. Guideline documents are numbered by
//! humans, so the master artifact must follow human ordering: digit runs
//! compare as integers, everything else compares case-insensitively.
//!
//! [`natural_key`] is a pure function from filename to a comparable token
//! sequence; sorting by it is the only ordering used anywhere in the batch.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static RE_DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// One chunk of a filename: either a run of digits (compared numerically)
/// or the text between digit runs (compared lower-cased).
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Text(String),
    Number(u64),
}

impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Token::Number(a), Token::Number(b)) => a.cmp(b),
            (Token::Text(a), Token::Text(b)) => a.cmp(b),
            // Numbers sort before text at the same position, matching how
            // "2.pdf" precedes "appendix.pdf".
            (Token::Number(_), Token::Text(_)) => Ordering::Less,
            (Token::Text(_), Token::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Comparable key for natural-order sorting of one filename.
///
/// Obtained via [`natural_key`]; sort filenames with
/// `names.sort_by_key(|n| natural_key(n))`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Token>);

/// Split a filename into alternating text and integer tokens.
///
/// Digit runs parse as `u64`; runs too long for `u64` fall back to text so
/// pathological names still sort deterministically. Text chunks are
/// lower-cased, so `Page2.pdf` and `page2.pdf` compare equal up to the
/// digits.
pub fn natural_key(filename: &str) -> NaturalKey {
    let mut tokens = Vec::new();
    let mut last = 0;

    for m in RE_DIGIT_RUN.find_iter(filename) {
        if m.start() > last {
            tokens.push(Token::Text(filename[last..m.start()].to_lowercase()));
        }
        match m.as_str().parse::<u64>() {
            Ok(n) => tokens.push(Token::Number(n)),
            Err(_) => tokens.push(Token::Text(m.as_str().to_string())),
        }
        last = m.end();
    }
    if last < filename.len() {
        tokens.push(Token::Text(filename[last..].to_lowercase()));
    }

    NaturalKey(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_by_key(|n| natural_key(n));
        names
    }

    #[test]
    fn digit_runs_compare_numerically() {
        assert_eq!(
            sorted(vec!["p2.pdf", "p10.pdf", "p1.pdf"]),
            vec!["p1.pdf", "p2.pdf", "p10.pdf"]
        );
    }

    #[test]
    fn case_insensitive_text() {
        assert_eq!(natural_key("Page2.PDF"), natural_key("page2.pdf"));
    }

    #[test]
    fn mixed_numbering_schemes() {
        assert_eq!(
            sorted(vec![
                "section10_part2.pdf",
                "section2_part10.pdf",
                "section2_part2.pdf",
            ]),
            vec![
                "section2_part2.pdf",
                "section2_part10.pdf",
                "section10_part2.pdf",
            ]
        );
    }

    #[test]
    fn plain_names_sort_lexically() {
        assert_eq!(
            sorted(vec!["beta.pdf", "alpha.pdf"]),
            vec!["alpha.pdf", "beta.pdf"]
        );
    }

    #[test]
    fn leading_zeros_compare_equal_numerically() {
        // 02 and 2 are the same integer; the tie is resolved stably by sort.
        assert_eq!(natural_key("02.pdf"), natural_key("2.pdf"));
    }

    #[test]
    fn number_sorts_before_text_at_same_position() {
        assert_eq!(
            sorted(vec!["appendix.pdf", "3.pdf"]),
            vec!["3.pdf", "appendix.pdf"]
        );
    }

    #[test]
    fn oversized_digit_run_still_orders() {
        let huge = "999999999999999999999999999999.pdf";
        // Falls back to text comparison rather than panicking.
        let _ = sorted(vec![huge, "1.pdf"]);
    }
}
