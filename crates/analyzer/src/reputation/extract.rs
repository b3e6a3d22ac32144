use std::collections::HashSet;

use regex::Regex;

use crate::filter::Patterns;
use crate::parser::LogRecord;

/// Pulls candidate IPs out of records for reputation checks.
#[derive(Debug, Clone)]
pub struct IpExtractor {
    pattern: Regex,
}

impl IpExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(Patterns::IPV4)?,
        })
    }

    /// Distinct IPs in first-seen order: a record's `ip` field when present,
    /// otherwise every dotted quad in its textual form.
    pub fn extract(&self, records: &[LogRecord]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut ips = Vec::new();

        for record in records {
            match record.ip.as_deref().filter(|ip| !ip.is_empty()) {
                Some(ip) => {
                    if seen.insert(ip.to_string()) {
                        ips.push(ip.to_string());
                    }
                }
                None => {
                    let text = record.text();
                    for m in self.pattern.find_iter(&text) {
                        if seen.insert(m.as_str().to_string()) {
                            ips.push(m.as_str().to_string());
                        }
                    }
                }
            }
        }
        ips
    }
}
