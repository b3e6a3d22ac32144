use crate::parser::grammar::RegexGrammar;
use crate::parser::traits::{LogFormat, ParseError};

/// BSD syslog body without the `<PRI>` prefix:
/// `Mon DD HH:MM:SS hostname service[pid]: message`
pub const SYSLOG_PATTERN: &str = r"(?P<timestamp>\w+ \d+ \d+:\d+:\d+) (?P<hostname>[\w\.-]+) (?P<service>[\w\[\]]+): (?P<message>.*)";

pub fn syslog_grammar() -> Result<RegexGrammar, ParseError> {
    RegexGrammar::new(LogFormat::Syslog, SYSLOG_PATTERN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::traits::LineGrammar;
    use serde_json::json;

    #[test]
    fn test_parse_sshd_line() {
        let line = "Oct 11 22:14:15 mymachine sshd[4721]: Failed password for root from 10.0.0.9 port 22";
        let record = syslog_grammar().unwrap().extract(line).unwrap();

        assert_eq!(record.format, LogFormat::Syslog);
        assert_eq!(record.timestamp.as_deref(), Some("Oct 11 22:14:15"));
        assert_eq!(record.field("hostname"), Some(&json!("mymachine")));
        assert_eq!(record.field("service"), Some(&json!("sshd[4721]")));
        assert_eq!(
            record.message.as_deref(),
            Some("Failed password for root from 10.0.0.9 port 22")
        );
        assert_eq!(record.ip, None);
    }

    #[test]
    fn test_dotted_hostname() {
        let line = "Jan 5 01:02:03 web-01.example.com cron: job done";
        let record = syslog_grammar().unwrap().extract(line).unwrap();
        assert_eq!(record.field("hostname"), Some(&json!("web-01.example.com")));
        assert_eq!(record.message.as_deref(), Some("job done"));
    }

    #[test]
    fn test_padded_day_does_not_match() {
        // Two spaces before a single-digit day are not part of the grammar.
        let line = "Jan  5 01:02:03 host cron: job done";
        assert!(syslog_grammar().unwrap().extract(line).is_none());
    }

    #[test]
    fn test_priority_prefix_does_not_match() {
        let line = "<34>Oct 11 22:14:15 mymachine su: 'su root' failed";
        assert!(syslog_grammar().unwrap().extract(line).is_none());
    }
}
