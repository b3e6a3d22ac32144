//! Behavioral patterns: bot/crawler traffic and brute-force logins.

use super::model::{Evidence, Finding, FindingKind, Pattern, RiskLevel, Thresholds};
use super::stats::non_empty;
use super::tally::Tally;
use crate::filter::SignatureMatcher;
use crate::parser::LogRecord;

pub fn identify(records: &[LogRecord], thresholds: &Thresholds, bot: &SignatureMatcher) -> Vec<Pattern> {
    let mut patterns = bot_activity(records, thresholds, bot);
    patterns.extend(brute_force(records, thresholds));
    patterns
}

/// Bot markers among the `bot_top_n` most frequent user agents.
pub fn bot_activity(records: &[LogRecord], thresholds: &Thresholds, bot: &SignatureMatcher) -> Vec<Pattern> {
    let agents: Tally<&str> = records
        .iter()
        .filter_map(|r| non_empty(&r.user_agent))
        .collect();

    agents
        .top(thresholds.bot_top_n)
        .into_iter()
        .filter(|(agent, _)| bot.is_match_str(agent))
        .map(|(agent, count)| {
            Finding::new(
                FindingKind::BotActivity,
                RiskLevel::Low,
                format!("Bot/crawler activity detected: {} requests", count),
            )
            .with_evidence(Evidence::UserAgent {
                user_agent: agent.to_string(),
                count,
            })
        })
        .collect()
}

/// Records mentioning "login" with a 401 status or the word "failed".
pub fn brute_force(records: &[LogRecord], thresholds: &Thresholds) -> Vec<Pattern> {
    let failed = records.iter().filter(|r| is_failed_login(r)).count();
    if failed <= thresholds.brute_force_min {
        return Vec::new();
    }

    vec![Finding::new(
        FindingKind::BruteForceAttempt,
        RiskLevel::High,
        format!("Potential brute force attack: {} failed login attempts", failed),
    )
    .with_evidence(Evidence::Count { count: failed })]
}

fn is_failed_login(record: &LogRecord) -> bool {
    let text = record.text().to_lowercase();
    text.contains("login") && (record.status.as_deref() == Some("401") || text.contains("failed"))
}
