/// Individual dialect grammars and document parsers

pub mod csv;
pub mod http_log;
pub mod json;
pub mod plain;
pub mod syslog;
pub mod windows_event;
pub mod xml;

pub use self::csv::CsvDocumentParser;
pub use http_log::{apache_grammar, nginx_grammar};
pub use json::JsonDocumentParser;
pub use plain::UnknownLine;
pub use syslog::syslog_grammar;
pub use windows_event::windows_event_grammar;
pub use xml::XmlDocumentParser;
