//! Habit management commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use habitstreak_core::{Config, Database, Event, HabitCategory, NewHabit};

use super::print_json;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit title
        title: String,
        /// Habit description
        #[arg(long, default_value = "")]
        description: String,
        /// Category: morning, work, fitness, evening or study
        #[arg(long, default_value = "morning")]
        category: HabitCategory,
        /// Reminder time (HH:MM)
        #[arg(long, default_value = "08:00")]
        reminder: String,
        /// Image URL
        #[arg(long)]
        image: Option<String>,
        /// Creator name shown with the habit
        #[arg(long, default_value = "")]
        creator_name: String,
        /// Creator email shown with the habit
        #[arg(long, default_value = "")]
        creator_email: String,
    },
    /// List habits
    List,
    /// Get habit details
    Show {
        /// Habit ID
        id: String,
    },
    /// Update a habit
    Update {
        /// Habit ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<HabitCategory>,
        /// New reminder time (HH:MM)
        #[arg(long)]
        reminder: Option<String>,
        /// New image URL (empty to clear)
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a habit and its completions
    Remove {
        /// Habit ID
        id: String,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;

    match action {
        HabitAction::Add {
            title,
            description,
            category,
            reminder,
            image,
            creator_name,
            creator_email,
        } => {
            let now = Utc::now();
            let habit = db.create_habit(
                NewHabit {
                    title,
                    description,
                    category,
                    reminder_time: reminder,
                    image,
                    creator_name,
                    creator_email,
                },
                now,
            )?;
            print_json(&Event::HabitCreated { habit, at: now }, &config)?;
        }
        HabitAction::List => {
            let habits = db.list_habits()?;
            print_json(&habits, &config)?;
        }
        HabitAction::Show { id } => {
            let habit = db.get_habit(&id)?;
            print_json(&habit, &config)?;
        }
        HabitAction::Update {
            id,
            title,
            description,
            category,
            reminder,
            image,
        } => {
            let current = db.get_habit(&id)?;
            let changes = NewHabit {
                title: title.unwrap_or(current.title),
                description: description.unwrap_or(current.description),
                category: category.unwrap_or(current.category),
                reminder_time: reminder.unwrap_or(current.reminder_time),
                image: image.or(current.image),
                creator_name: current.creator_name,
                creator_email: current.creator_email,
            };
            let habit = db.update_habit(&id, changes)?;
            print_json(&Event::HabitUpdated { habit, at: Utc::now() }, &config)?;
        }
        HabitAction::Remove { id } => {
            db.delete_habit(&id)?;
            print_json(
                &Event::HabitDeleted {
                    habit_id: id,
                    at: Utc::now(),
                },
                &config,
            )?;
        }
    }
    Ok(())
}
