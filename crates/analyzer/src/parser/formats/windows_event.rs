use crate::parser::grammar::RegexGrammar;
use crate::parser::traits::{LogFormat, ParseError};

/// Exported Windows event line:
/// `YYYY-MM-DD HH:MM:SS level source event_id message`
pub const WINDOWS_EVENT_PATTERN: &str = r"(?P<timestamp>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) (?P<level>\w+) (?P<source>[\w\.]+) (?P<event_id>\d+) (?P<message>.*)";

pub fn windows_event_grammar() -> Result<RegexGrammar, ParseError> {
    RegexGrammar::new(LogFormat::WindowsEvent, WINDOWS_EVENT_PATTERN)
}
