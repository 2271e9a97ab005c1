use chrono::{DateTime, Utc};
use clap::Args;
use habitstreak_core::{CompletionStore, Config, Database, Event};

use super::{parse_instant, print_json, resolve_now};

#[derive(Args)]
pub struct CompleteArgs {
    /// Habit ID
    pub id: String,
    /// Record as of this instant instead of now (RFC 3339)
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,
}

/// Prints `CompletionRecorded`, or `CompletionAlreadyRecorded` when today is
/// already covered. Both exit successfully.
pub fn run(args: CompleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let now = resolve_now(args.at);

    let outcome = db.record_completion(&args.id, now)?;
    let event = Event::from_outcome(&args.id, outcome, now);
    if !outcome.is_appended() {
        eprintln!("You already marked this habit complete today.");
    }
    print_json(&event, &config)
}
