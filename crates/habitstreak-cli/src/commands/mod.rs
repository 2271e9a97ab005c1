pub mod complete;
pub mod config;
pub mod habit;
pub mod status;

use chrono::{DateTime, Utc};
use habitstreak_core::Config;
use serde::Serialize;

/// clap value parser for `--at` style RFC 3339 instants.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp like 2024-03-10T08:00:00Z ({e})"))
}

/// The injected clock: `--at` when given, otherwise the system time read once.
pub fn resolve_now(at: Option<DateTime<Utc>>) -> DateTime<Utc> {
    at.unwrap_or_else(Utc::now)
}

pub fn print_json<T: Serialize>(value: &T, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let json = if config.output.pretty_json {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
