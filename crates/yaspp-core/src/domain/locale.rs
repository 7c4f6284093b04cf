//! Locale tag parsing.

use std::sync::OnceLock;

use regex::Regex;

fn locale_tag() -> Option<&'static Regex> {
    static TAG: OnceLock<Option<Regex>> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"^[A-Za-z]{2,5}(-[A-Za-z]{2,5})?$").ok())
        .as_ref()
}

/// Split a free-form language list on commas and whitespace, keeping only
/// segments shaped like `xx` or `xx-YY` (2-5 letters per part).
///
/// Order is preserved; repeated tags are dropped.
pub fn parse_langs(input: &str) -> Vec<String> {
    let mut langs: Vec<String> = Vec::new();
    for candidate in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
    {
        let valid = locale_tag().is_some_and(|re| re.is_match(candidate));
        if valid && !langs.iter().any(|l| l == candidate) {
            langs.push(candidate.to_string());
        }
    }
    langs
}

/// Find `locale` in `langs` ignoring case, returning the listed spelling.
pub fn find_locale<'a>(langs: &'a [String], locale: &str) -> Option<&'a str> {
    langs
        .iter()
        .find(|l| l.eq_ignore_ascii_case(locale))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_separators() {
        assert_eq!(parse_langs("en, fr-CA  de"), vec!["en", "fr-CA", "de"]);
    }

    #[test]
    fn nothing_matches() {
        assert!(parse_langs("e,  123").is_empty());
    }

    #[test]
    fn rejects_overlong_and_numeric_regions() {
        assert_eq!(parse_langs("english en-US es-419 abcdef"), vec!["en-US"]);
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(parse_langs("en,en  he"), vec!["en", "he"]);
    }

    #[test]
    fn lookup_ignores_case() {
        let langs = vec!["en".to_string(), "fr-CA".to_string()];
        assert_eq!(find_locale(&langs, "FR-ca"), Some("fr-CA"));
        assert_eq!(find_locale(&langs, "de"), None);
    }
}
