use std::sync::atomic::{AtomicU64, Ordering};
use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),
}

#[derive(Debug, Default)]
pub struct MatchStats {
    pub haystacks_scanned: AtomicU64,
    pub haystacks_matched: AtomicU64,
    pub bytes_processed: AtomicU64,
}

/// A compiled pattern answering "does this text contain a match".
///
/// Shared read-only between detector tasks; the counters are relaxed atomics.
pub struct SignatureMatcher {
    matcher: RegexMatcher,
    stats: MatchStats,
}

impl SignatureMatcher {
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self, PatternError> {
        let matcher = RegexMatcherBuilder::new()
            .case_insensitive(!case_sensitive)
            .multi_line(false)
            .build(pattern)
            .map_err(|e| PatternError::InvalidRegex(e.to_string()))?;

        Ok(Self {
            matcher,
            stats: MatchStats::default(),
        })
    }

    /// Case-insensitive matcher, the mode every built-in pattern uses.
    pub fn case_insensitive(pattern: &str) -> Result<Self, PatternError> {
        Self::new(pattern, false)
    }

    #[inline]
    pub fn is_match(&self, haystack: &[u8]) -> bool {
        self.stats.haystacks_scanned.fetch_add(1, Ordering::Relaxed);
        self.stats.bytes_processed.fetch_add(haystack.len() as u64, Ordering::Relaxed);

        let matched = self.matcher.is_match(haystack).unwrap_or(false);
        if matched {
            self.stats.haystacks_matched.fetch_add(1, Ordering::Relaxed);
        }
        matched
    }

    #[inline]
    pub fn is_match_str(&self, haystack: &str) -> bool {
        self.is_match(haystack.as_bytes())
    }

    pub fn stats(&self) -> (u64, u64, u64) {
        (
            self.stats.haystacks_scanned.load(Ordering::Relaxed),
            self.stats.haystacks_matched.load(Ordering::Relaxed),
            self.stats.bytes_processed.load(Ordering::Relaxed),
        )
    }
}

impl std::fmt::Debug for SignatureMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (scanned, matched, _) = self.stats();
        f.debug_struct("SignatureMatcher")
            .field("scanned", &scanned)
            .field("matched", &matched)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_match() {
        let matcher = SignatureMatcher::case_insensitive("error")
            .expect("Failed to create matcher");

        assert!(matcher.is_match(b"This is an error message"));
        assert!(matcher.is_match(b"ERROR: Critical failure"));
        assert!(!matcher.is_match(b"This is a debug message"));
    }

    #[test]
    fn test_case_sensitive_match() {
        let matcher = SignatureMatcher::new("Error", true)
            .expect("Failed to create matcher");

        assert!(matcher.is_match(b"Error: something"));
        assert!(!matcher.is_match(b"error: something"));
        assert!(!matcher.is_match(b"ERROR: something"));
    }

    #[test]
    fn test_str_helper() {
        let matcher = SignatureMatcher::case_insensitive("login").unwrap();
        assert!(matcher.is_match_str("POST /LOGIN failed"));
    }

    #[test]
    fn test_invalid_regex() {
        let result = SignatureMatcher::new("[invalid", true);
        assert!(matches!(result, Err(PatternError::InvalidRegex(_))));
    }

    #[test]
    fn test_stats_tracking() {
        let matcher = SignatureMatcher::case_insensitive("test")
            .expect("Failed to create matcher");

        matcher.is_match(b"test message");
        matcher.is_match(b"another message");
        matcher.is_match(b"test again");

        let (scanned, matched, bytes) = matcher.stats();
        assert_eq!(scanned, 3);
        assert_eq!(matched, 2);
        assert!(bytes > 0);
    }
}
