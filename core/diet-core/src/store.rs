//! SQLite persistence for meals, meal items, and check-ins.
//!
//! The schema is intentionally small: three tables keyed by an owning user.
//! The reminder engine never touches this store directly; it consumes the
//! read-only snapshot produced by [`MealStore::reminder_snapshot`].

use crate::error::{DietError, Result};
use crate::types::{CheckIn, Meal, MealItem};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use dietwatch_daemon_protocol::SnapshotMeal;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::PathBuf;
use ulid::Ulid;

pub struct MealStore {
    path: PathBuf,
}

/// Outcome of a check-in toggle: done for the date, or undone again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInToggle {
    Done(CheckIn),
    Undone,
}

/// Adherence for one calendar day: how many meals were scheduled for that
/// weekday and how many were checked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAdherence {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub scheduled: usize,
    pub completed: usize,
}

impl MealStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent).map_err(|err| DietError::Io {
                context: "create store directory".to_string(),
                source: err,
            })?;
        }
        let store = Self { path };
        store.init_schema()?;
        Ok(store)
    }

    fn with_connection<T>(&self, f: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut conn = Connection::open(&self.path).map_err(|err| DietError::Db {
            context: "open database".to_string(),
            source: err,
        })?;
        f(&mut conn)
    }

    fn init_schema(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS meals (
                     id TEXT PRIMARY KEY,
                     user_id TEXT NOT NULL,
                     name TEXT NOT NULL,
                     scheduled_time TEXT NOT NULL,
                     day_of_week INTEGER NOT NULL,
                     created_at TEXT NOT NULL,
                     updated_at TEXT NOT NULL
                 );
                 CREATE INDEX IF NOT EXISTS idx_meals_user_day
                     ON meals(user_id, day_of_week);
                 CREATE TABLE IF NOT EXISTS meal_items (
                     id TEXT PRIMARY KEY,
                     meal_id TEXT NOT NULL,
                     user_id TEXT NOT NULL,
                     description TEXT NOT NULL,
                     created_at TEXT NOT NULL
                 );
                 CREATE INDEX IF NOT EXISTS idx_meal_items_meal
                     ON meal_items(meal_id);
                 CREATE TABLE IF NOT EXISTS check_ins (
                     id TEXT PRIMARY KEY,
                     meal_id TEXT NOT NULL,
                     user_id TEXT NOT NULL,
                     completed_at TEXT NOT NULL,
                     check_in_date TEXT NOT NULL
                 );
                 CREATE UNIQUE INDEX IF NOT EXISTS idx_check_ins_meal_date
                     ON check_ins(meal_id, check_in_date);",
            )
            .map_err(|err| DietError::Db {
                context: "initialize schema".to_string(),
                source: err,
            })
        })
    }

    pub fn create_meal(
        &self,
        user_id: &str,
        name: &str,
        scheduled_time: &str,
        day_of_week: u8,
    ) -> Result<Meal> {
        let meal = Meal {
            id: Ulid::new().to_string(),
            user_id: user_id.to_string(),
            name: name.trim().to_string(),
            scheduled_time: scheduled_time.to_string(),
            day_of_week,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            meal_items: Vec::new(),
        };
        meal.snapshot()
            .validate()
            .map_err(|err| DietError::InvalidMeal(err.message))?;

        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO meals (id, user_id, name, scheduled_time, day_of_week, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    meal.id,
                    meal.user_id,
                    meal.name,
                    meal.scheduled_time,
                    meal.day_of_week,
                    meal.created_at.to_rfc3339(),
                    meal.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|err| DietError::Db {
                context: "insert meal".to_string(),
                source: err,
            })?;
            Ok(())
        })?;

        Ok(meal)
    }

    pub fn get_meal(&self, user_id: &str, meal_id: &str) -> Result<Meal> {
        let mut meals = self.query_meals(
            "SELECT id, user_id, name, scheduled_time, day_of_week, created_at, updated_at
             FROM meals WHERE user_id = ?1 AND id = ?2",
            params![user_id, meal_id],
        )?;
        meals
            .pop()
            .ok_or_else(|| DietError::MealNotFound(meal_id.to_string()))
    }

    /// All of a user's meals, weekday-then-time ordered, items attached.
    pub fn list_meals(&self, user_id: &str) -> Result<Vec<Meal>> {
        self.query_meals(
            "SELECT id, user_id, name, scheduled_time, day_of_week, created_at, updated_at
             FROM meals WHERE user_id = ?1
             ORDER BY day_of_week ASC, scheduled_time ASC",
            params![user_id],
        )
    }

    pub fn meals_for_day(&self, user_id: &str, day_of_week: u8) -> Result<Vec<Meal>> {
        self.query_meals(
            "SELECT id, user_id, name, scheduled_time, day_of_week, created_at, updated_at
             FROM meals WHERE user_id = ?1 AND day_of_week = ?2
             ORDER BY scheduled_time ASC",
            params![user_id, day_of_week],
        )
    }

    pub fn update_meal(
        &self,
        user_id: &str,
        meal_id: &str,
        name: Option<&str>,
        scheduled_time: Option<&str>,
        day_of_week: Option<u8>,
    ) -> Result<Meal> {
        let mut meal = self.get_meal(user_id, meal_id)?;
        if let Some(name) = name {
            meal.name = name.trim().to_string();
        }
        if let Some(time) = scheduled_time {
            meal.scheduled_time = time.to_string();
        }
        if let Some(day) = day_of_week {
            meal.day_of_week = day;
        }
        meal.updated_at = Utc::now();
        meal.snapshot()
            .validate()
            .map_err(|err| DietError::InvalidMeal(err.message))?;

        self.with_connection(|conn| {
            conn.execute(
                "UPDATE meals SET name = ?1, scheduled_time = ?2, day_of_week = ?3, updated_at = ?4
                 WHERE user_id = ?5 AND id = ?6",
                params![
                    meal.name,
                    meal.scheduled_time,
                    meal.day_of_week,
                    meal.updated_at.to_rfc3339(),
                    user_id,
                    meal_id,
                ],
            )
            .map_err(|err| DietError::Db {
                context: "update meal".to_string(),
                source: err,
            })?;
            Ok(())
        })?;

        Ok(meal)
    }

    /// Deletes a meal along with its items and check-ins.
    pub fn delete_meal(&self, user_id: &str, meal_id: &str) -> Result<()> {
        self.with_connection(|conn| {
            let tx = conn.transaction().map_err(|err| DietError::Db {
                context: "begin delete transaction".to_string(),
                source: err,
            })?;
            let deleted = tx
                .execute(
                    "DELETE FROM meals WHERE user_id = ?1 AND id = ?2",
                    params![user_id, meal_id],
                )
                .map_err(|err| DietError::Db {
                    context: "delete meal".to_string(),
                    source: err,
                })?;
            if deleted == 0 {
                return Err(DietError::MealNotFound(meal_id.to_string()));
            }
            tx.execute(
                "DELETE FROM meal_items WHERE user_id = ?1 AND meal_id = ?2",
                params![user_id, meal_id],
            )
            .map_err(|err| DietError::Db {
                context: "delete meal items".to_string(),
                source: err,
            })?;
            tx.execute(
                "DELETE FROM check_ins WHERE user_id = ?1 AND meal_id = ?2",
                params![user_id, meal_id],
            )
            .map_err(|err| DietError::Db {
                context: "delete meal check-ins".to_string(),
                source: err,
            })?;
            tx.commit().map_err(|err| DietError::Db {
                context: "commit delete transaction".to_string(),
                source: err,
            })
        })
    }

    pub fn add_item(&self, user_id: &str, meal_id: &str, description: &str) -> Result<MealItem> {
        // Existence check keeps orphan items out; there is no FK enforcement.
        self.get_meal(user_id, meal_id)?;

        let item = MealItem {
            id: Ulid::new().to_string(),
            meal_id: meal_id.to_string(),
            user_id: user_id.to_string(),
            description: description.trim().to_string(),
            created_at: Utc::now(),
        };

        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO meal_items (id, meal_id, user_id, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    item.id,
                    item.meal_id,
                    item.user_id,
                    item.description,
                    item.created_at.to_rfc3339(),
                ],
            )
            .map_err(|err| DietError::Db {
                context: "insert meal item".to_string(),
                source: err,
            })?;
            Ok(())
        })?;

        Ok(item)
    }

    pub fn remove_item(&self, user_id: &str, item_id: &str) -> Result<()> {
        self.with_connection(|conn| {
            let deleted = conn
                .execute(
                    "DELETE FROM meal_items WHERE user_id = ?1 AND id = ?2",
                    params![user_id, item_id],
                )
                .map_err(|err| DietError::Db {
                    context: "delete meal item".to_string(),
                    source: err,
                })?;
            if deleted == 0 {
                return Err(DietError::MealItemNotFound(item_id.to_string()));
            }
            Ok(())
        })
    }

    /// Checking in twice for the same date undoes the first check-in.
    pub fn toggle_check_in(
        &self,
        user_id: &str,
        meal_id: &str,
        date: NaiveDate,
    ) -> Result<CheckInToggle> {
        self.get_meal(user_id, meal_id)?;
        let date_key = date.format("%Y-%m-%d").to_string();

        self.with_connection(|conn| {
            let existing: Option<String> = conn
                .query_row(
                    "SELECT id FROM check_ins
                     WHERE user_id = ?1 AND meal_id = ?2 AND check_in_date = ?3",
                    params![user_id, meal_id, date_key],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|err| DietError::Db {
                    context: "query check-in".to_string(),
                    source: err,
                })?;

            if let Some(id) = existing {
                conn.execute("DELETE FROM check_ins WHERE id = ?1", params![id])
                    .map_err(|err| DietError::Db {
                        context: "delete check-in".to_string(),
                        source: err,
                    })?;
                return Ok(CheckInToggle::Undone);
            }

            let check_in = CheckIn {
                id: Ulid::new().to_string(),
                meal_id: meal_id.to_string(),
                user_id: user_id.to_string(),
                completed_at: Utc::now(),
                check_in_date: date_key,
            };
            conn.execute(
                "INSERT INTO check_ins (id, meal_id, user_id, completed_at, check_in_date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    check_in.id,
                    check_in.meal_id,
                    check_in.user_id,
                    check_in.completed_at.to_rfc3339(),
                    check_in.check_in_date,
                ],
            )
            .map_err(|err| DietError::Db {
                context: "insert check-in".to_string(),
                source: err,
            })?;
            Ok(CheckInToggle::Done(check_in))
        })
    }

    pub fn check_ins_for_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<CheckIn>> {
        let date_key = date.format("%Y-%m-%d").to_string();
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, meal_id, user_id, completed_at, check_in_date
                     FROM check_ins WHERE user_id = ?1 AND check_in_date = ?2
                     ORDER BY completed_at ASC",
                )
                .map_err(|err| DietError::Db {
                    context: "prepare check-in query".to_string(),
                    source: err,
                })?;
            let rows = stmt
                .query_map(params![user_id, date_key], |row| {
                    Ok(CheckIn {
                        id: row.get(0)?,
                        meal_id: row.get(1)?,
                        user_id: row.get(2)?,
                        completed_at: timestamp_from_row(3, row.get::<_, String>(3)?)?,
                        check_in_date: row.get(4)?,
                    })
                })
                .map_err(|err| DietError::Db {
                    context: "query check-ins".to_string(),
                    source: err,
                })?;

            let mut check_ins = Vec::new();
            for row in rows {
                check_ins.push(row.map_err(|err| DietError::Db {
                    context: "decode check-in row".to_string(),
                    source: err,
                })?);
            }
            Ok(check_ins)
        })
    }

    /// Per-day adherence over an inclusive date range: scheduled = meals
    /// registered for that weekday, completed = check-ins recorded that day.
    pub fn adherence(&self, user_id: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<DayAdherence>> {
        let scheduled_per_weekday: HashMap<u8, usize> = self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT day_of_week, COUNT(*) FROM meals
                     WHERE user_id = ?1 GROUP BY day_of_week",
                )
                .map_err(|err| DietError::Db {
                    context: "prepare weekday counts".to_string(),
                    source: err,
                })?;
            let rows = stmt
                .query_map(params![user_id], |row| {
                    Ok((row.get::<_, i64>(0)? as u8, row.get::<_, i64>(1)? as usize))
                })
                .map_err(|err| DietError::Db {
                    context: "query weekday counts".to_string(),
                    source: err,
                })?;
            let mut counts = HashMap::new();
            for row in rows {
                let (day, count) = row.map_err(|err| DietError::Db {
                    context: "decode weekday count".to_string(),
                    source: err,
                })?;
                counts.insert(day, count);
            }
            Ok(counts)
        })?;

        let completed_per_date: HashMap<String, usize> = self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT check_in_date, COUNT(*) FROM check_ins
                     WHERE user_id = ?1 AND check_in_date BETWEEN ?2 AND ?3
                     GROUP BY check_in_date",
                )
                .map_err(|err| DietError::Db {
                    context: "prepare check-in counts".to_string(),
                    source: err,
                })?;
            let rows = stmt
                .query_map(
                    params![
                        user_id,
                        from.format("%Y-%m-%d").to_string(),
                        to.format("%Y-%m-%d").to_string()
                    ],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize)),
                )
                .map_err(|err| DietError::Db {
                    context: "query check-in counts".to_string(),
                    source: err,
                })?;
            let mut counts = HashMap::new();
            for row in rows {
                let (date, count) = row.map_err(|err| DietError::Db {
                    context: "decode check-in count".to_string(),
                    source: err,
                })?;
                counts.insert(date, count);
            }
            Ok(counts)
        })?;

        let mut days = Vec::new();
        let mut date = from;
        while date <= to {
            let weekday = date.weekday().num_days_from_sunday() as u8;
            let date_key = date.format("%Y-%m-%d").to_string();
            days.push(DayAdherence {
                scheduled: scheduled_per_weekday.get(&weekday).copied().unwrap_or(0),
                completed: completed_per_date.get(&date_key).copied().unwrap_or(0),
                date: date_key,
            });
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Ok(days)
    }

    /// The filtered, read-only meal list the reminder engine polls over.
    pub fn reminder_snapshot(&self, user_id: &str) -> Result<Vec<SnapshotMeal>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, name, scheduled_time, day_of_week FROM meals
                     WHERE user_id = ?1
                     ORDER BY day_of_week ASC, scheduled_time ASC",
                )
                .map_err(|err| DietError::Db {
                    context: "prepare snapshot query".to_string(),
                    source: err,
                })?;
            let rows = stmt
                .query_map(params![user_id], |row| {
                    Ok(SnapshotMeal {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        scheduled_time: row.get(2)?,
                        day_of_week: row.get::<_, i64>(3)? as u8,
                    })
                })
                .map_err(|err| DietError::Db {
                    context: "query snapshot".to_string(),
                    source: err,
                })?;

            let mut meals = Vec::new();
            for row in rows {
                meals.push(row.map_err(|err| DietError::Db {
                    context: "decode snapshot row".to_string(),
                    source: err,
                })?);
            }
            Ok(meals)
        })
    }

    fn query_meals(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Meal>> {
        let mut meals = self.with_connection(|conn| {
            let mut stmt = conn.prepare(sql).map_err(|err| DietError::Db {
                context: "prepare meal query".to_string(),
                source: err,
            })?;
            let rows = stmt
                .query_map(params, |row| {
                    Ok(Meal {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        scheduled_time: row.get(3)?,
                        day_of_week: row.get::<_, i64>(4)? as u8,
                        created_at: timestamp_from_row(5, row.get::<_, String>(5)?)?,
                        updated_at: timestamp_from_row(6, row.get::<_, String>(6)?)?,
                        meal_items: Vec::new(),
                    })
                })
                .map_err(|err| DietError::Db {
                    context: "query meals".to_string(),
                    source: err,
                })?;

            let mut meals = Vec::new();
            for row in rows {
                meals.push(row.map_err(|err| DietError::Db {
                    context: "decode meal row".to_string(),
                    source: err,
                })?);
            }
            Ok(meals)
        })?;

        if meals.is_empty() {
            return Ok(meals);
        }
        let mut items = self.items_by_meal(&meals[0].user_id)?;
        for meal in &mut meals {
            if let Some(meal_items) = items.remove(&meal.id) {
                meal.meal_items = meal_items;
            }
        }
        Ok(meals)
    }

    fn items_by_meal(&self, user_id: &str) -> Result<HashMap<String, Vec<MealItem>>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, meal_id, user_id, description, created_at
                     FROM meal_items WHERE user_id = ?1 ORDER BY created_at ASC",
                )
                .map_err(|err| DietError::Db {
                    context: "prepare item query".to_string(),
                    source: err,
                })?;
            let rows = stmt
                .query_map(params![user_id], |row| {
                    Ok(MealItem {
                        id: row.get(0)?,
                        meal_id: row.get(1)?,
                        user_id: row.get(2)?,
                        description: row.get(3)?,
                        created_at: timestamp_from_row(4, row.get::<_, String>(4)?)?,
                    })
                })
                .map_err(|err| DietError::Db {
                    context: "query items".to_string(),
                    source: err,
                })?;

            let mut by_meal: HashMap<String, Vec<MealItem>> = HashMap::new();
            for row in rows {
                let item = row.map_err(|err| DietError::Db {
                    context: "decode item row".to_string(),
                    source: err,
                })?;
                by_meal.entry(item.meal_id.clone()).or_default().push(item);
            }
            Ok(by_meal)
        })
    }
}

fn timestamp_from_row(index: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                index,
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, MealStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = MealStore::new(dir.path().join("meals.db")).expect("open store");
        (dir, store)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn create_and_list_meals_ordered() {
        let (_dir, store) = store();
        store
            .create_meal("u1", "Dinner", "19:00:00", 3)
            .expect("create dinner");
        store
            .create_meal("u1", "Breakfast", "08:00:00", 3)
            .expect("create breakfast");
        store
            .create_meal("u1", "Sunday brunch", "11:00:00", 0)
            .expect("create brunch");

        let meals = store.list_meals("u1").expect("list");
        assert_eq!(meals.len(), 3);
        assert_eq!(meals[0].name, "Sunday brunch");
        assert_eq!(meals[1].name, "Breakfast");
        assert_eq!(meals[2].name, "Dinner");
    }

    #[test]
    fn meals_are_scoped_to_their_user() {
        let (_dir, store) = store();
        store
            .create_meal("u1", "Lunch", "12:30:00", 3)
            .expect("create");
        assert!(store.list_meals("u2").expect("list").is_empty());
        assert!(store.reminder_snapshot("u2").expect("snapshot").is_empty());
    }

    #[test]
    fn create_rejects_invalid_schedule() {
        let (_dir, store) = store();
        assert!(store.create_meal("u1", "Lunch", "25:00", 3).is_err());
        assert!(store.create_meal("u1", "Lunch", "12:30", 7).is_err());
        assert!(store.create_meal("u1", "  ", "12:30", 3).is_err());
    }

    #[test]
    fn update_meal_changes_schedule() {
        let (_dir, store) = store();
        let meal = store
            .create_meal("u1", "Lunch", "12:30:00", 3)
            .expect("create");
        let updated = store
            .update_meal("u1", &meal.id, None, Some("13:00"), Some(4))
            .expect("update");
        assert_eq!(updated.scheduled_time, "13:00");
        assert_eq!(updated.day_of_week, 4);
        assert_eq!(updated.name, "Lunch");

        let fetched = store.get_meal("u1", &meal.id).expect("get");
        assert_eq!(fetched.scheduled_time, "13:00");
    }

    #[test]
    fn delete_meal_cascades_items_and_check_ins() {
        let (_dir, store) = store();
        let meal = store
            .create_meal("u1", "Lunch", "12:30:00", 3)
            .expect("create");
        store
            .add_item("u1", &meal.id, "rice and beans")
            .expect("add item");
        store
            .toggle_check_in("u1", &meal.id, date(2026, 8, 5))
            .expect("check in");

        store.delete_meal("u1", &meal.id).expect("delete");
        assert!(matches!(
            store.get_meal("u1", &meal.id),
            Err(DietError::MealNotFound(_))
        ));
        assert!(store
            .check_ins_for_date("u1", date(2026, 8, 5))
            .expect("check-ins")
            .is_empty());
    }

    #[test]
    fn items_attach_to_their_meal() {
        let (_dir, store) = store();
        let meal = store
            .create_meal("u1", "Lunch", "12:30:00", 3)
            .expect("create");
        store.add_item("u1", &meal.id, "rice").expect("add rice");
        store.add_item("u1", &meal.id, "beans").expect("add beans");

        let meals = store.list_meals("u1").expect("list");
        assert_eq!(meals[0].meal_items.len(), 2);
        assert_eq!(meals[0].meal_items[0].description, "rice");
    }

    #[test]
    fn add_item_requires_existing_meal() {
        let (_dir, store) = store();
        assert!(matches!(
            store.add_item("u1", "missing", "rice"),
            Err(DietError::MealNotFound(_))
        ));
    }

    #[test]
    fn check_in_toggles_per_meal_per_date() {
        let (_dir, store) = store();
        let meal = store
            .create_meal("u1", "Lunch", "12:30:00", 3)
            .expect("create");

        let first = store
            .toggle_check_in("u1", &meal.id, date(2026, 8, 5))
            .expect("toggle on");
        assert!(matches!(first, CheckInToggle::Done(_)));
        assert_eq!(
            store
                .check_ins_for_date("u1", date(2026, 8, 5))
                .expect("list")
                .len(),
            1
        );

        let second = store
            .toggle_check_in("u1", &meal.id, date(2026, 8, 5))
            .expect("toggle off");
        assert_eq!(second, CheckInToggle::Undone);
        assert!(store
            .check_ins_for_date("u1", date(2026, 8, 5))
            .expect("list")
            .is_empty());

        // A different date is independent.
        let other = store
            .toggle_check_in("u1", &meal.id, date(2026, 8, 12))
            .expect("toggle other day");
        assert!(matches!(other, CheckInToggle::Done(_)));
    }

    #[test]
    fn adherence_counts_scheduled_vs_completed() {
        let (_dir, store) = store();
        // Two meals on Wednesday, one on Thursday.
        let lunch = store
            .create_meal("u1", "Lunch", "12:30:00", 3)
            .expect("lunch");
        store
            .create_meal("u1", "Dinner", "19:00:00", 3)
            .expect("dinner");
        store
            .create_meal("u1", "Breakfast", "08:00:00", 4)
            .expect("breakfast");

        // 2026-08-05 is a Wednesday; check in lunch only.
        store
            .toggle_check_in("u1", &lunch.id, date(2026, 8, 5))
            .expect("check in");

        let days = store
            .adherence("u1", date(2026, 8, 5), date(2026, 8, 6))
            .expect("adherence");
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2026-08-05");
        assert_eq!(days[0].scheduled, 2);
        assert_eq!(days[0].completed, 1);
        assert_eq!(days[1].date, "2026-08-06");
        assert_eq!(days[1].scheduled, 1);
        assert_eq!(days[1].completed, 0);
    }

    #[test]
    fn reminder_snapshot_carries_only_matcher_fields() {
        let (_dir, store) = store();
        let meal = store
            .create_meal("u1", "Lunch", "12:30:00", 3)
            .expect("create");
        store.add_item("u1", &meal.id, "rice").expect("add item");

        let snapshot = store.reminder_snapshot("u1").expect("snapshot");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, meal.id);
        assert_eq!(snapshot[0].scheduled_time, "12:30:00");
        assert_eq!(snapshot[0].day_of_week, 3);
    }
}
