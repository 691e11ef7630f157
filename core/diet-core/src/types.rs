//! Domain types shared by the store, the CLI, and the reminder engine.

use chrono::{DateTime, Utc};
use dietwatch_daemon_protocol::SnapshotMeal;
use serde::{Deserialize, Serialize};

pub const DAYS_OF_WEEK: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn weekday_name(day_of_week: u8) -> &'static str {
    DAYS_OF_WEEK
        .get(day_of_week as usize)
        .copied()
        .unwrap_or("unknown")
}

/// A recurring meal registered for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// `HH:MM[:SS]`, local time.
    pub scheduled_time: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub meal_items: Vec<MealItem>,
}

impl Meal {
    /// The read-only view the notifier consumes; meal items never travel with
    /// the snapshot.
    pub fn snapshot(&self) -> SnapshotMeal {
        SnapshotMeal {
            id: self.id.clone(),
            name: self.name.clone(),
            scheduled_time: self.scheduled_time.clone(),
            day_of_week: self.day_of_week,
        }
    }
}

/// One line of a meal's composition ("2 eggs", "200ml juice"). Informational
/// only to the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealItem {
    pub id: String,
    pub meal_id: String,
    pub user_id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A completed meal on a calendar day. At most one per meal per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: String,
    pub meal_id: String,
    pub user_id: String,
    pub completed_at: DateTime<Utc>,
    /// `YYYY-MM-DD`.
    pub check_in_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_names_cover_all_indices() {
        assert_eq!(weekday_name(0), "Sunday");
        assert_eq!(weekday_name(3), "Wednesday");
        assert_eq!(weekday_name(6), "Saturday");
        assert_eq!(weekday_name(7), "unknown");
    }

    #[test]
    fn snapshot_strips_items() {
        let meal = Meal {
            id: "m1".to_string(),
            user_id: "u1".to_string(),
            name: "Lunch".to_string(),
            scheduled_time: "12:30:00".to_string(),
            day_of_week: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            meal_items: vec![MealItem {
                id: "i1".to_string(),
                meal_id: "m1".to_string(),
                user_id: "u1".to_string(),
                description: "rice and beans".to_string(),
                created_at: Utc::now(),
            }],
        };

        let snapshot = meal.snapshot();
        assert_eq!(snapshot.id, "m1");
        assert_eq!(snapshot.day_of_week, 3);
        assert!(snapshot.validate().is_ok());
    }
}
