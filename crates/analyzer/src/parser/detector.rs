use super::formats::*;
use super::traits::*;

/// How an input is read, decided from its source hint alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Json,
    Csv,
    Xml,
    /// Line-oriented text run through the grammar chain
    Text,
}

impl DocumentKind {
    /// Accepts `json`, `.json`, `JSON`; anything unrecognized is text.
    pub fn from_hint(hint: &str) -> Self {
        let hint = hint.trim().trim_start_matches('.').to_ascii_lowercase();
        match hint.as_str() {
            "json" => DocumentKind::Json,
            "csv" => DocumentKind::Csv,
            "xml" => DocumentKind::Xml,
            _ => DocumentKind::Text,
        }
    }
}

/// Ordered dialect grammars for text lines; the first grammar that matches
/// claims the line.
///
/// Order is apache, nginx, syslog, windows_event. Because apache is a prefix
/// of nginx and grammars are only anchored at the start, apache claims nginx
/// lines too and `referer`/`user_agent` stay empty for them.
pub struct GrammarChain {
    grammars: Vec<Box<dyn LineGrammar>>,
}

impl GrammarChain {
    pub fn new() -> Result<Self, ParseError> {
        let grammars: Vec<Box<dyn LineGrammar>> = vec![
            Box::new(apache_grammar()?),
            Box::new(nginx_grammar()?),
            Box::new(syslog_grammar()?),
            Box::new(windows_event_grammar()?),
        ];
        Ok(Self { grammars })
    }

    pub fn extract(&self, line: &str) -> Option<LogRecord> {
        self.grammars.iter().find_map(|grammar| grammar.extract(line))
    }

    /// Dialect tags in evaluation order.
    pub fn order(&self) -> Vec<LogFormat> {
        self.grammars.iter().map(|g| g.format()).collect()
    }
}

impl std::fmt::Debug for GrammarChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarChain").field("order", &self.order()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMBINED: &str = r#"10.0.0.5 - - [29/Jan/2026:10:59:12 +0000] "GET / HTTP/1.1" 200 1024 "-" "Googlebot/2.1""#;

    #[test]
    fn test_document_kind_from_hint() {
        assert_eq!(DocumentKind::from_hint("json"), DocumentKind::Json);
        assert_eq!(DocumentKind::from_hint(".CSV"), DocumentKind::Csv);
        assert_eq!(DocumentKind::from_hint("xml"), DocumentKind::Xml);
        assert_eq!(DocumentKind::from_hint("log"), DocumentKind::Text);
        assert_eq!(DocumentKind::from_hint(""), DocumentKind::Text);
    }

    #[test]
    fn test_chain_order() {
        let chain = GrammarChain::new().unwrap();
        assert_eq!(
            chain.order(),
            vec![LogFormat::Apache, LogFormat::Nginx, LogFormat::Syslog, LogFormat::WindowsEvent]
        );
    }

    #[test]
    fn test_apache_claims_combined_lines() {
        let chain = GrammarChain::new().unwrap();
        let record = chain.extract(COMBINED).unwrap();
        assert_eq!(record.format, LogFormat::Apache);
        assert_eq!(record.user_agent, None);
    }

    #[test]
    fn test_nginx_grammar_alone_reads_user_agent() {
        let record = nginx_grammar().unwrap().extract(COMBINED).unwrap();
        assert_eq!(record.format, LogFormat::Nginx);
        assert_eq!(record.user_agent.as_deref(), Some("Googlebot/2.1"));
    }

    #[test]
    fn test_each_dialect_reached() {
        let chain = GrammarChain::new().unwrap();
        let syslog = chain.extract("Mar 3 10:00:00 host sshd[1]: Accepted key").unwrap();
        assert_eq!(syslog.format, LogFormat::Syslog);

        let win = chain.extract("2026-03-03 10:00:00 Error App 1000 crashed").unwrap();
        assert_eq!(win.format, LogFormat::WindowsEvent);

        assert!(chain.extract("free-form text").is_none());
    }
}
