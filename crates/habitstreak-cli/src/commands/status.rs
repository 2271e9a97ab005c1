use chrono::{DateTime, Utc};
use clap::Args;
use habitstreak_core::{CompletionStore, Config, Database, Habit, HabitProgress};
use serde::Serialize;

use super::{parse_instant, print_json, resolve_now};

#[derive(Args)]
pub struct StatusArgs {
    /// Habit ID (all habits when omitted)
    pub id: Option<String>,
    /// Evaluate as of this instant instead of now (RFC 3339)
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct HabitStatus {
    habit: Habit,
    #[serde(flatten)]
    progress: HabitProgress,
}

pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let engine = config.engine();
    let now = resolve_now(args.at);

    let status_of = |habit: Habit| -> Result<HabitStatus, Box<dyn std::error::Error>> {
        let history = db.history(&habit.id)?;
        Ok(HabitStatus {
            progress: engine.summarize(&history, now),
            habit,
        })
    };

    match args.id {
        Some(id) => {
            let status = status_of(db.get_habit(&id)?)?;
            print_json(&status, &config)
        }
        None => {
            let statuses = db
                .list_habits()?
                .into_iter()
                .map(status_of)
                .collect::<Result<Vec<_>, _>>()?;
            print_json(&statuses, &config)
        }
    }
}
