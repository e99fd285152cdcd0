//! Path and query parameter parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ApiError;
use crate::scope::DateScope;

/// Length of a `YYYY-MM-DD-YYYY-MM-DD` scope.
pub const SCOPE_LEN: usize = 21;

/// Page size used when `limit` is absent or not a number.
pub const DEFAULT_LIMIT: usize = 20;

/// Dashes before the start/end boundary of a scope.
const SCOPE_SPLIT_DASH: usize = 3;

static COUNTRY_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+$").expect("valid regex"));

/// Raw query pairs in request order. Repeated keys are kept, so a duplicate
/// parameter never fails extraction.
pub type QueryPairs = Vec<(String, String)>;

/// First value given for `key`, like a form lookup.
pub fn first_param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Lowercase a name, then capitalize its first letter.
///
/// The case provider matches names case-sensitively on the first letter, so
/// `nORWAY` has to become `Norway`.
pub fn normalize_country_name(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Extract and normalize the country from the path remainder after the
/// resource prefix. It must be a single alphabetic segment.
pub fn country_from_path(rest: &str) -> Result<String, ApiError> {
    if !COUNTRY_NAME.is_match(rest) {
        return Err(ApiError::MalformedRequest("Malformed URL".to_string()));
    }
    Ok(normalize_country_name(rest))
}

/// Split a 21-character scope at its third dash into start and end dates.
///
/// Any other length, or a string without three dashes, yields two empty
/// dates: an unusable scope means "no scope", not an error.
pub fn split_scope(raw: &str) -> (String, String) {
    if raw.len() != SCOPE_LEN {
        return (String::new(), String::new());
    }

    match raw.match_indices('-').nth(SCOPE_SPLIT_DASH - 1) {
        Some((at, _)) => (raw[..at].to_string(), raw[at + 1..].to_string()),
        None => (String::new(), String::new()),
    }
}

/// Parse an optional scope query value.
pub fn parse_scope(raw: Option<&str>) -> DateScope {
    let (start, end) = split_scope(raw.unwrap_or_default());
    DateScope::from_dates(&start, &end)
}

/// Parse a page size, falling back to [`DEFAULT_LIMIT`].
pub fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_first_letter_only() {
        assert_eq!(normalize_country_name("nORWAY"), "Norway");
        assert_eq!(normalize_country_name("norway"), "Norway");
        assert_eq!(normalize_country_name("N"), "N");
        assert_eq!(normalize_country_name(""), "");
    }

    #[test]
    fn path_must_be_one_alphabetic_segment() {
        assert_eq!(country_from_path("sWEDEN").unwrap(), "Sweden");
        assert!(country_from_path("norway/extra").is_err());
        assert!(country_from_path("norway/").is_err());
        assert!(country_from_path("n0rway").is_err());
        assert!(country_from_path("").is_err());
    }

    #[test]
    fn splits_valid_scope() {
        let (start, end) = split_scope("2020-03-01-2020-03-03");
        assert_eq!(start, "2020-03-01");
        assert_eq!(end, "2020-03-03");
        assert_eq!(start.len(), 10);
        assert_eq!(end.len(), 10);
    }

    #[test]
    fn other_lengths_are_no_scope() {
        for raw in ["", "2020-03-01", "2020-03-01-2020-03-3", "2020-03-01-2020-03-031"] {
            assert_eq!(split_scope(raw), (String::new(), String::new()), "{raw}");
        }
    }

    #[test]
    fn scope_without_enough_dashes_is_no_scope() {
        assert_eq!(split_scope("202003010-2020030300x"), (String::new(), String::new()));
    }

    #[test]
    fn parse_scope_builds_range() {
        assert_eq!(parse_scope(None), DateScope::Total);
        assert_eq!(parse_scope(Some("bogus")), DateScope::Total);
        assert_eq!(
            parse_scope(Some("2020-03-01-2020-03-03")),
            DateScope::Range {
                start: "2020-03-01".to_string(),
                end: "2020-03-03".to_string(),
            }
        );
    }

    #[test]
    fn first_param_wins_over_repeats() {
        let pairs: QueryPairs = vec![
            ("limit".to_string(), "5".to_string()),
            ("scope".to_string(), "2020-03-01-2020-03-03".to_string()),
            ("scope".to_string(), "x".to_string()),
        ];

        assert_eq!(first_param(&pairs, "scope"), Some("2020-03-01-2020-03-03"));
        assert_eq!(first_param(&pairs, "limit"), Some("5"));
        assert_eq!(first_param(&pairs, "page"), None);
    }

    #[test]
    fn limit_falls_back_to_default() {
        assert_eq!(parse_limit(Some("5")), 5);
        assert_eq!(parse_limit(Some("five")), DEFAULT_LIMIT);
        assert_eq!(parse_limit(Some("-1")), DEFAULT_LIMIT);
        assert_eq!(parse_limit(None), DEFAULT_LIMIT);
    }
}
