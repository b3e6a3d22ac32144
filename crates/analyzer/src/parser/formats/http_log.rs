use crate::parser::grammar::RegexGrammar;
use crate::parser::traits::{LogFormat, ParseError};

/// Apache common log format:
/// `ip - user [timestamp] "METHOD path protocol" status size`
pub const APACHE_PATTERN: &str = r#"(?P<ip>\d+\.\d+\.\d+\.\d+) - (?P<user>[\w-]+) \[(?P<timestamp>[^\]]+)\] "(?P<method>\w+) (?P<path>[^ ]+) (?P<protocol>[^"]+)" (?P<status>\d+) (?P<size>\d+)"#;

/// Nginx combined format: the apache fields plus quoted referer and user-agent.
pub const NGINX_PATTERN: &str = r#"(?P<ip>\d+\.\d+\.\d+\.\d+) - (?P<user>[\w-]+) \[(?P<timestamp>[^\]]+)\] "(?P<method>\w+) (?P<path>[^ ]+) (?P<protocol>[^"]+)" (?P<status>\d+) (?P<size>\d+) "(?P<referer>[^"]*)" "(?P<user_agent>[^"]*)""#;

pub fn apache_grammar() -> Result<RegexGrammar, ParseError> {
    RegexGrammar::new(LogFormat::Apache, APACHE_PATTERN)
}

pub fn nginx_grammar() -> Result<RegexGrammar, ParseError> {
    RegexGrammar::new(LogFormat::Nginx, NGINX_PATTERN)
}
