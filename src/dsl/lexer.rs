//! Low-level scanning helpers for the WHERE-clause language.
//!
//! The language has no real token stream: clauses are split on the `AND`
//! and `OR` keywords, and each fragment is searched for an operator token.
//! Numbers only appear through the lenient prefix coercion used by the
//! numeric operators.

use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, opt};
use winnow::prelude::*;
use winnow::token::one_of;

// Manually define PResult for resilience against winnow version changes
type PResult<T> = Result<T, winnow::error::ErrMode<winnow::error::ContextError>>;

fn sign(input: &mut &str) -> PResult<()> {
    opt(one_of(['+', '-'])).void().parse_next(input)
}

/// `digits [. digits?] | . digits`, with an optional exponent.
fn decimal<'i>(input: &mut &'i str) -> PResult<&'i str> {
    (
        sign,
        alt(((digit1, opt(('.', digit0))).void(), ('.', digit1).void())),
        opt((one_of(['e', 'E']), sign, digit1)),
    )
        .take()
        .parse_next(input)
}

fn infinity<'i>(input: &mut &'i str) -> PResult<&'i str> {
    (sign, "Infinity").take().parse_next(input)
}

/// Lex the longest float literal at the start of the input.
fn float_literal<'i>(input: &mut &'i str) -> PResult<&'i str> {
    alt((infinity, decimal)).parse_next(input)
}

/// Parse the longest float prefix of `text`, skipping leading whitespace.
///
/// `"50 mph"` gives `Some(50.0)`, `"abc"` gives `None`.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let mut input = text.trim_start();
    let literal = float_literal(&mut input).ok()?;
    literal.parse::<f64>().ok()
}

/// True when the whole trimmed text is a single float literal.
pub fn is_float_literal(text: &str) -> bool {
    let mut input = text.trim();
    if input.is_empty() {
        return false;
    }
    float_literal(&mut input).is_ok() && input.is_empty()
}

/// Split `text` on `keyword` surrounded by whitespace, case-insensitively.
///
/// The whitespace runs on both sides belong to the separator. A keyword at
/// the very start or end of the text never separates.
pub fn split_keyword<'a>(text: &'a str, keyword: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut seg_start = 0;
    let mut pos = 0;

    while let Some((run_start, run_end)) = next_whitespace_run(text, pos) {
        let rest = &text[run_end..];
        let after_kw = run_end + keyword.len();
        let is_separator = rest.len() > keyword.len()
            && rest.is_char_boundary(keyword.len())
            && rest[..keyword.len()].eq_ignore_ascii_case(keyword)
            && rest[keyword.len()..].starts_with(char::is_whitespace);

        if is_separator {
            parts.push(&text[seg_start..run_start]);
            let next = next_whitespace_run(text, after_kw)
                .map(|(_, end)| end)
                .unwrap_or(text.len());
            seg_start = next;
            pos = next;
        } else {
            pos = run_end;
        }
    }

    parts.push(&text[seg_start..]);
    parts
}

/// Locate the next run of whitespace at or after `from`, as byte offsets.
fn next_whitespace_run(text: &str, from: usize) -> Option<(usize, usize)> {
    let start = from + text[from..].find(char::is_whitespace)?;
    let end = text[start..]
        .find(|c: char| !c.is_whitespace())
        .map(|offset| start + offset)
        .unwrap_or(text.len());
    Some((start, end))
}

/// Find the first eligible occurrence of an operator token in an
/// upper-cased fragment.
///
/// Keyword tokens must stand as whole words: preceded by whitespace and not
/// followed by an identifier character. Symbol tokens match anywhere.
pub fn find_token(upper: &str, token: &str, keyword: bool) -> Option<usize> {
    if !keyword {
        return upper.find(token);
    }

    upper.match_indices(token).map(|(idx, _)| idx).find(|&idx| {
        let before = upper[..idx].chars().next_back();
        let after = upper[idx + token.len()..].chars().next();
        before.is_some_and(char::is_whitespace)
            && !after.is_some_and(|c| c.is_alphanumeric() || c == '_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_prefix() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix("  -3.5e2xyz"), Some(-350.0));
        assert_eq!(parse_float_prefix("50 mph"), Some(50.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("7."), Some(7.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_float_prefix("N/A"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("-"), None);
    }

    #[test]
    fn test_float_literal() {
        assert!(is_float_literal("75000"));
        assert!(is_float_literal(" 1.25 "));
        assert!(is_float_literal("-2e3"));
        assert!(!is_float_literal("12abc"));
        assert!(!is_float_literal("1,000"));
        assert!(!is_float_literal(""));
    }

    #[test]
    fn test_split_keyword() {
        assert_eq!(
            split_keyword("A = '1' AND B = '2' and C = '3'", "AND"),
            vec!["A = '1'", "B = '2'", "C = '3'"]
        );
        assert_eq!(split_keyword("Brand = 'Sandy'", "AND"), vec!["Brand = 'Sandy'"]);
        assert_eq!(split_keyword("A\tOR\n B", "OR"), vec!["A", "B"]);
    }

    #[test]
    fn test_split_keyword_consumes_whitespace() {
        // The separator eats the whitespace on both sides, so a doubled
        // keyword leaves the second one in the next part.
        assert_eq!(split_keyword("A AND AND B", "AND"), vec!["A", "AND B"]);
        assert_eq!(split_keyword("AND A", "AND"), vec!["AND A"]);
        assert_eq!(split_keyword("A AND", "AND"), vec!["A AND"]);
    }

    #[test]
    fn test_find_token() {
        assert_eq!(find_token("COUNT >= 5", ">=", false), Some(6));
        assert_eq!(find_token("STATUS = 'PENDING'", "IN", true), None);
        assert_eq!(find_token("STATUS IN 'A,B'", "IN", true), Some(7));
        assert_eq!(find_token("NAME IS NULL", "IS NULL", true), Some(5));
        assert_eq!(find_token("IN 'A'", "IN", true), None);
    }
}
