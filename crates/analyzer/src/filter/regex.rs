//! Regex: the catalogue of built-in patterns.
//!
//! Every pattern here is compiled case-insensitively through
//! [`SignatureMatcher::case_insensitive`].

use crate::filter::engine::{PatternError, SignatureMatcher};

/// Well-known patterns used by the classifier and the detectors.
pub struct Patterns;

impl Patterns {
    /// ERROR keyword family.
    pub const SEVERITY_ERROR: &'static str = r"\b(error|err|fatal|critical|failed)\b";

    /// WARNING keyword family.
    pub const SEVERITY_WARNING: &'static str = r"\b(warning|warn|alert)\b";

    /// INFO keyword family.
    pub const SEVERITY_INFO: &'static str = r"\b(info|information|notice)\b";

    /// DEBUG keyword family.
    pub const SEVERITY_DEBUG: &'static str = r"\b(debug|trace|verbose)\b";

    /// SQL keywords followed by whitespace.
    pub const SQL_INJECTION: &'static str = r"(union|select|insert|delete|update|drop|create)\s+";

    /// Script injection markers.
    pub const XSS: &'static str = r"(<script|javascript:|onerror=|onload=)";

    /// Directory escape, raw or URL-encoded.
    pub const PATH_TRAVERSAL: &'static str = r"(\.\./|\.\.\\|%2e%2e)";

    /// Automated client markers in a user-agent string.
    pub const BOT_USER_AGENT: &'static str = r"(bot|crawler|spider|scraper)";

    /// Credential-like key immediately followed by `=`.
    pub const SENSITIVE_ASSIGNMENT: &'static str = r"(password|passwd|pwd|api_key|token|secret)=";

    /// Dotted-quad candidates inside free text.
    pub const IPV4: &'static str = r"\b(?:\d{1,3}\.){3}\d{1,3}\b";
}

/// Compiled attack-signature families, in reporting order.
#[derive(Debug)]
pub struct AttackSignatures {
    pub sql_injection: SignatureMatcher,
    pub xss: SignatureMatcher,
    pub path_traversal: SignatureMatcher,
}

impl AttackSignatures {
    pub fn new() -> Result<Self, PatternError> {
        Ok(Self {
            sql_injection: SignatureMatcher::case_insensitive(Patterns::SQL_INJECTION)?,
            xss: SignatureMatcher::case_insensitive(Patterns::XSS)?,
            path_traversal: SignatureMatcher::case_insensitive(Patterns::PATH_TRAVERSAL)?,
        })
    }
}

/// Convenience: bot/crawler user-agent matcher.
pub fn bot_user_agent() -> Result<SignatureMatcher, PatternError> {
    SignatureMatcher::case_insensitive(Patterns::BOT_USER_AGENT)
}

/// Convenience: credential assignment matcher.
pub fn sensitive_assignment() -> Result<SignatureMatcher, PatternError> {
    SignatureMatcher::case_insensitive(Patterns::SENSITIVE_ASSIGNMENT)
}

// ── Tests ───────────────────────────────────────────────────────
