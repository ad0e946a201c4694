use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};
use powchain_core::{survey::TrialStats, Block, ChainEvent, EventSink};

/// Prints chain events as plain text on stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, event: &ChainEvent) {
        println!("{}", render_event(event));
    }
}

pub fn render_event(event: &ChainEvent) -> String {
    match event {
        ChainEvent::BlockMined {
            index,
            duration,
            digest,
            trials,
        } => format!(
            "Block #{index} mined in {}ms after {trials} trials: {digest}",
            duration.as_millis()
        ),
        ChainEvent::ValidationFailed { index, reason } => {
            format!("Block #{index} is invalid: {reason}")
        }
    }
}

/// RFC 3339 in UTC with millisecond precision; raw millis if out of range.
pub fn format_timestamp(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| millis.to_string())
}

pub fn render_chain(blocks: &[Block]) -> String {
    let mut out = String::from("--- Blockchain ---\n");
    for b in blocks {
        let _ = writeln!(out, "Index: {}", b.index());
        let _ = writeln!(out, "Timestamp: {}", format_timestamp(b.timestamp()));
        let _ = writeln!(out, "Data: {}", b.payload());
        let _ = writeln!(out, "Previous Hash: {}", b.previous_digest());
        let _ = writeln!(out, "Nonce: {}", b.nonce());
        let _ = writeln!(out, "Hash: {}", b.digest());
        out.push_str("------------------\n");
    }
    out
}

pub fn render_survey(stats: &[TrialStats], growth: &[f64]) -> String {
    let mut out = format!(
        "{:>10} {:>8} {:>14} {:>10} {:>10} {:>8}\n",
        "difficulty", "samples", "mean_trials", "min", "max", "growth"
    );
    for (i, s) in stats.iter().enumerate() {
        let g = match i.checked_sub(1).and_then(|j| growth.get(j)) {
            Some(g) => format!("{g:.1}x"),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:>10} {:>8} {:>14.1} {:>10} {:>10} {:>8}",
            s.difficulty, s.samples, s.mean_trials, s.min_trials, s.max_trials, g
        );
    }
    out
}
