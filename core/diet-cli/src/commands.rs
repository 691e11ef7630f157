//! CRUD and query subcommands over the local meal store.
//!
//! Mutations that change the meal list re-relay the snapshot to the daemon,
//! so background reminders track edits made while no watcher runs.

use crate::daemon_client;
use chrono::{Local, NaiveDate};
use diet_core::types::weekday_name;
use diet_core::{CheckInToggle, MealStore, Result};

pub fn meal_add(store: &MealStore, user_id: &str, name: &str, time: &str, day: u8) -> Result<()> {
    let meal = store.create_meal(user_id, name, time, day)?;
    println!(
        "Added {} ({}) - {} {}",
        meal.name,
        meal.id,
        weekday_name(meal.day_of_week),
        meal.scheduled_time
    );
    relay_snapshot(store, user_id);
    Ok(())
}

pub fn meal_list(store: &MealStore, user_id: &str, day: Option<u8>) -> Result<()> {
    let meals = match day {
        Some(day) => store.meals_for_day(user_id, day)?,
        None => store.list_meals(user_id)?,
    };

    if meals.is_empty() {
        println!("No meals registered.");
        return Ok(());
    }

    for meal in meals {
        println!(
            "{}  {:<9} {:<8} {}",
            meal.id,
            weekday_name(meal.day_of_week),
            meal.scheduled_time,
            meal.name
        );
        for item in &meal.meal_items {
            println!("  {}  - {}", item.id, item.description);
        }
    }
    Ok(())
}

pub fn meal_set(
    store: &MealStore,
    user_id: &str,
    meal_id: &str,
    name: Option<&str>,
    time: Option<&str>,
    day: Option<u8>,
) -> Result<()> {
    let meal = store.update_meal(user_id, meal_id, name, time, day)?;
    println!(
        "Updated {} - {} {} {}",
        meal.id,
        weekday_name(meal.day_of_week),
        meal.scheduled_time,
        meal.name
    );
    relay_snapshot(store, user_id);
    Ok(())
}

pub fn meal_remove(store: &MealStore, user_id: &str, meal_id: &str) -> Result<()> {
    store.delete_meal(user_id, meal_id)?;
    println!("Removed {}", meal_id);
    relay_snapshot(store, user_id);
    Ok(())
}

pub fn item_add(store: &MealStore, user_id: &str, meal_id: &str, description: &str) -> Result<()> {
    let item = store.add_item(user_id, meal_id, description)?;
    println!("Added item {} to {}", item.id, meal_id);
    Ok(())
}

pub fn item_remove(store: &MealStore, user_id: &str, item_id: &str) -> Result<()> {
    store.remove_item(user_id, item_id)?;
    println!("Removed item {}", item_id);
    Ok(())
}

pub fn checkin(
    store: &MealStore,
    user_id: &str,
    meal_id: &str,
    date: Option<NaiveDate>,
) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    match store.toggle_check_in(user_id, meal_id, date)? {
        CheckInToggle::Done(check_in) => {
            println!("Checked in {} for {}", meal_id, check_in.check_in_date)
        }
        CheckInToggle::Undone => println!("Check-in undone for {} on {}", meal_id, date),
    }
    Ok(())
}

pub fn history(store: &MealStore, user_id: &str, days: u32) -> Result<()> {
    let today = Local::now().date_naive();
    let lookback = days.saturating_sub(1) as i64;
    let from = today - chrono::Duration::days(lookback);

    let adherence = store.adherence(user_id, from, today)?;
    for day in adherence {
        let marker = if day.scheduled > 0 && day.completed >= day.scheduled {
            "✓"
        } else {
            " "
        };
        let percent = if day.scheduled > 0 {
            day.completed * 100 / day.scheduled
        } else {
            0
        };
        println!(
            "{} {}  {}/{} meals ({}%)",
            marker, day.date, day.completed, day.scheduled, percent
        );
    }
    Ok(())
}

pub fn daemon_health() {
    match daemon_client::daemon_health() {
        Ok(data) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string())
            );
        }
        Err(err) => println!("Daemon unreachable: {}", err),
    }
}

/// Best-effort snapshot relay; failures degrade to foreground-only reminders.
pub fn relay_snapshot(store: &MealStore, user_id: &str) {
    if !daemon_client::relay_enabled() {
        return;
    }
    match store.reminder_snapshot(user_id) {
        Ok(meals) => {
            if let Err(err) = daemon_client::send_snapshot(&meals) {
                tracing::warn!(error = %err, "Daemon relay unavailable; reminders stay foreground-only");
            }
        }
        Err(err) => tracing::warn!(error = %err, "Failed to read reminder snapshot for relay"),
    }
}
