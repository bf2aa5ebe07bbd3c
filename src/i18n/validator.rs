//! Translation quality checks.
//!
//! Slide text runs carry their paragraph breaks inline, so a translation that
//! drops or adds a linefeed changes the layout of the slide once it is written
//! back. These checks only report; they never alter the translation.

use regex::Regex;
use std::sync::OnceLock;

/// Findings about one translated fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

pub struct TranslationValidator;

static URL_REGEX: OnceLock<Regex> = OnceLock::new();

impl TranslationValidator {
    /// Compare a fragment with its translation.
    ///
    /// Checks that:
    /// - the number of linefeeds is unchanged
    /// - a trailing linefeed (paragraph end) is kept
    /// - URLs survive verbatim
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::default();

        let orig_linefeeds = original.matches('\n').count();
        let trans_linefeeds = translated.matches('\n').count();
        if orig_linefeeds != trans_linefeeds {
            report.warnings.push(format!(
                "Linefeed mismatch: original has {}, translation has {}",
                orig_linefeeds, trans_linefeeds
            ));
        }

        if original.ends_with('\n') != translated.ends_with('\n') {
            report
                .warnings
                .push("Trailing linefeed not preserved".to_string());
        }

        let orig_urls = Self::extract_urls(original);
        let trans_urls = Self::extract_urls(translated);
        if orig_urls != trans_urls {
            report.warnings.push(format!(
                "URL mismatch: original has {:?}, translation has {:?}",
                orig_urls, trans_urls
            ));
        }

        report
    }

    fn extract_urls(text: &str) -> Vec<&str> {
        let regex = URL_REGEX.get_or_init(|| Regex::new(r"https?://[^\s)\]]+").unwrap());
        regex.find_iter(text).map(|m| m.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_translation() {
        let report = TranslationValidator::validate("Hello world\n", "Hallo Welt\n");
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_dropped_trailing_linefeed() {
        let report = TranslationValidator::validate("Agenda\n", "Tagesordnung");
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].contains("Linefeed mismatch"));
        assert!(report.warnings[1].contains("Trailing linefeed"));
    }

    #[test]
    fn test_added_linefeed() {
        let report = TranslationValidator::validate("One line", "Eine\nZeile");
        assert!(report.warnings[0].contains("original has 0, translation has 1"));
    }

    #[test]
    fn test_url_preserved() {
        let report = TranslationValidator::validate(
            "See https://example.com/docs for details",
            "Siehe https://example.com/docs für Details",
        );
        assert!(report.is_clean());
    }

    #[test]
    fn test_url_altered() {
        let report = TranslationValidator::validate(
            "See https://example.com/docs",
            "Siehe https://beispiel.de/dokumente",
        );
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("URL mismatch"));
    }

    #[test]
    fn test_extract_urls_stops_at_closing_paren() {
        let urls = TranslationValidator::extract_urls("(https://a.example/x) and http://b.example");
        assert_eq!(urls, vec!["https://a.example/x", "http://b.example"]);
    }
}
