//! dietwatch: CLI client for the diet-adherence tracker.
//!
//! Manages recurring meals, items, and check-ins in the local store, and runs
//! the foreground reminder watcher. Whenever the meal list changes, the new
//! snapshot is relayed to the background daemon so reminders keep firing
//! after this process exits.

mod commands;
mod daemon_client;
mod logging;
mod watch;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use diet_core::{config, MealStore};

#[derive(Parser)]
#[command(name = "dietwatch")]
#[command(about = "Diet adherence tracker with meal reminders")]
#[command(version)]
struct Cli {
    /// Act as this user instead of the configured one
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recurring meals
    Meal {
        #[command(subcommand)]
        command: MealCommands,
    },

    /// Manage a meal's items
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// Toggle a check-in for a meal (defaults to today)
    Checkin {
        meal_id: String,

        /// Calendar date, YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show adherence history
    History {
        /// Number of days to look back, ending today
        #[arg(long, default_value_t = 7)]
        days: u32,
    },

    /// Run the foreground reminder watcher (toasts + system notifications)
    Watch,

    /// Query the background daemon's health
    DaemonHealth,
}

#[derive(Subcommand)]
enum MealCommands {
    /// Register a recurring meal
    Add {
        name: String,

        /// Scheduled time, HH:MM or HH:MM:SS
        #[arg(value_name = "TIME")]
        time: String,

        /// Weekday index, 0 = Sunday .. 6 = Saturday
        #[arg(value_name = "DAY")]
        day: u8,
    },

    /// List registered meals
    List {
        /// Only this weekday (0 = Sunday .. 6 = Saturday)
        #[arg(long)]
        day: Option<u8>,
    },

    /// Change a meal's name or schedule
    Set {
        meal_id: String,

        #[arg(long)]
        name: Option<String>,

        /// New time, HH:MM or HH:MM:SS
        #[arg(long)]
        time: Option<String>,

        /// New weekday index
        #[arg(long)]
        day: Option<u8>,
    },

    /// Delete a meal along with its items and check-ins
    Remove { meal_id: String },
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Add an item line to a meal
    Add { meal_id: String, description: String },

    /// Remove an item by id
    Remove { item_id: String },
}

fn main() {
    let _logging_guard = logging::init();
    let cli = Cli::parse();

    let client_config = config::load_config();
    let user_id = cli
        .user
        .unwrap_or_else(|| client_config.user_id.clone());

    let result = match cli.command {
        Commands::Watch => watch::run(&user_id, &client_config),
        command => run_command(command, &user_id),
    };

    if let Err(err) = result {
        eprintln!("error: {}", err);
        tracing::error!(error = %err, "dietwatch command failed");
        std::process::exit(1);
    }
}

fn run_command(command: Commands, user_id: &str) -> diet_core::Result<()> {
    let store = MealStore::new(config::store_path()?)?;

    match command {
        Commands::Meal { command } => match command {
            MealCommands::Add { name, time, day } => {
                commands::meal_add(&store, user_id, &name, &time, day)
            }
            MealCommands::List { day } => commands::meal_list(&store, user_id, day),
            MealCommands::Set {
                meal_id,
                name,
                time,
                day,
            } => commands::meal_set(
                &store,
                user_id,
                &meal_id,
                name.as_deref(),
                time.as_deref(),
                day,
            ),
            MealCommands::Remove { meal_id } => commands::meal_remove(&store, user_id, &meal_id),
        },
        Commands::Item { command } => match command {
            ItemCommands::Add {
                meal_id,
                description,
            } => commands::item_add(&store, user_id, &meal_id, &description),
            ItemCommands::Remove { item_id } => commands::item_remove(&store, user_id, &item_id),
        },
        Commands::Checkin { meal_id, date } => commands::checkin(&store, user_id, &meal_id, date),
        Commands::History { days } => commands::history(&store, user_id, days),
        Commands::DaemonHealth => {
            commands::daemon_health();
            Ok(())
        }
        Commands::Watch => unreachable!("watch is dispatched before store setup"),
    }
}
