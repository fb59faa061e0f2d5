//! Daily entry model
//!
//! One record per (profile, calendar day). Writes are upserts keyed on that
//! pair, so repeated logging for the same day updates in place.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::energy;

/// One day of tracking for a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyEntry {
    pub id: i64,
    pub profile_id: i64,
    pub date: String, // ISO date: "2025-01-09"
    pub calories_consumed: i64,
    pub steps_taken: i64,
    /// User-entered gym/cardio burn
    pub gym_calories: i64,
    /// Derived burn from logged workouts
    pub exercise_calories: i64,
    /// Delta-accumulated calorie availability adjustment; never recomputed
    /// from totals, only nudged by exercise-burn deltas
    pub adjustment: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial update for a daily entry; None leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyEntryUpdate {
    pub calories_consumed: Option<i64>,
    pub steps_taken: Option<i64>,
    pub gym_calories: Option<i64>,
}

impl DailyEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            profile_id: row.get("profile_id")?,
            date: row.get("date")?,
            calories_consumed: row.get("calories_consumed")?,
            steps_taken: row.get("steps_taken")?,
            gym_calories: row.get("gym_calories")?,
            exercise_calories: row.get("exercise_calories")?,
            adjustment: row.get("adjustment")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Calories from steps, derived on read
    pub fn step_calories(&self) -> i64 {
        energy::step_calories(self.steps_taken)
    }

    /// Total calories burned for the day, derived on read
    pub fn total_burned(&self) -> i64 {
        self.step_calories() + self.gym_calories + self.exercise_calories
    }

    /// Get an entry by (profile, date)
    pub fn get(conn: &Connection, profile_id: i64, date: &str) -> DbResult<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM daily_entries WHERE profile_id = ?1 AND date = ?2")?;

        let result = stmt.query_row(params![profile_id, date], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get an entry by row id
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM daily_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get or create the entry for a (profile, date) pair. The insert
    /// tolerates losing a race with another connection creating the same
    /// pair; whoever wins, the stored row is returned.
    pub fn get_or_create(conn: &Connection, profile_id: i64, date: &str) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO daily_entries (profile_id, date) VALUES (?1, ?2)
             ON CONFLICT(profile_id, date) DO NOTHING",
            params![profile_id, date],
        )?;

        Self::get(conn, profile_id, date)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Upsert the user-entered fields for a (profile, date) pair. The first
    /// write creates the row; later writes update the same row.
    pub fn upsert(
        conn: &Connection,
        profile_id: i64,
        date: &str,
        data: &DailyEntryUpdate,
    ) -> DbResult<Self> {
        let entry = Self::get_or_create(conn, profile_id, date)?;

        conn.execute(
            r#"
            UPDATE daily_entries SET
                calories_consumed = ?1,
                steps_taken = ?2,
                gym_calories = ?3,
                updated_at = datetime('now')
            WHERE id = ?4
            "#,
            params![
                data.calories_consumed.unwrap_or(entry.calories_consumed),
                data.steps_taken.unwrap_or(entry.steps_taken),
                data.gym_calories.unwrap_or(entry.gym_calories),
                entry.id,
            ],
        )?;

        Self::get_by_id(conn, entry.id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Set the step count for a (profile, date) pair, e.g. from an imported
    /// health-data reading
    pub fn set_steps(conn: &Connection, profile_id: i64, date: &str, steps: i64) -> DbResult<Self> {
        Self::upsert(
            conn,
            profile_id,
            date,
            &DailyEntryUpdate {
                steps_taken: Some(steps),
                ..Default::default()
            },
        )
    }

    /// Record a new exercise burn for the entry and fold the change into the
    /// adjustment accumulator. The adjustment is only ever moved by deltas
    /// (new minus previous), never recomputed from current totals, so
    /// re-saving the same burn is a no-op.
    pub fn apply_exercise_burn(conn: &Connection, id: i64, new_burn: i64) -> DbResult<Option<Self>> {
        let entry = match Self::get_by_id(conn, id)? {
            Some(e) => e,
            None => return Ok(None),
        };

        let delta = new_burn - entry.exercise_calories;
        let adjustment = if delta == 0 {
            entry.adjustment
        } else {
            Some(entry.adjustment.unwrap_or(0) + delta)
        };

        conn.execute(
            r#"
            UPDATE daily_entries SET
                exercise_calories = ?1,
                adjustment = ?2,
                updated_at = datetime('now')
            WHERE id = ?3
            "#,
            params![new_burn, adjustment, id],
        )?;

        Self::get_by_id(conn, id)
    }

    /// List entries for a profile, newest first, with optional date range
    pub fn list_for_profile(
        conn: &Connection,
        profile_id: i64,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM daily_entries WHERE profile_id = ?1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(profile_id)];

        if let Some(start) = start_date {
            params_vec.push(Box::new(start.to_string()));
            sql.push_str(&format!(" AND date >= ?{}", params_vec.len()));
        }

        if let Some(end) = end_date {
            params_vec.push(Box::new(end.to_string()));
            sql.push_str(&format!(" AND date <= ?{}", params_vec.len()));
        }

        sql.push_str(" ORDER BY date DESC");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let entries = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// List entries for one calendar month of a profile, oldest first
    pub fn list_for_month(
        conn: &Connection,
        profile_id: i64,
        year: i32,
        month: u32,
    ) -> DbResult<Vec<Self>> {
        let prefix = format!("{:04}-{:02}-%", year, month);
        let mut stmt = conn.prepare(
            "SELECT * FROM daily_entries WHERE profile_id = ?1 AND date LIKE ?2 ORDER BY date",
        )?;
        let entries = stmt
            .query_map(params![profile_id, prefix], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_repeated_upserts_keep_one_row() {
        let conn = test_conn();

        for consumed in [500, 1200, 1800] {
            DailyEntry::upsert(
                &conn,
                1,
                "2026-08-15",
                &DailyEntryUpdate {
                    calories_consumed: Some(consumed),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM daily_entries WHERE profile_id = 1 AND date = '2026-08-15'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        let entry = DailyEntry::get(&conn, 1, "2026-08-15").unwrap().unwrap();
        assert_eq!(entry.calories_consumed, 1800);
    }

    #[test]
    fn test_get_or_create_tolerates_existing_row() {
        let conn = test_conn();

        // Row created out-of-band, as if another connection won the race
        conn.execute(
            "INSERT INTO daily_entries (profile_id, date, calories_consumed) VALUES (1, '2026-08-15', 900)",
            [],
        )
        .unwrap();
        let existing_id = conn.last_insert_rowid();

        let entry = DailyEntry::get_or_create(&conn, 1, "2026-08-15").unwrap();
        assert_eq!(entry.id, existing_id);
        assert_eq!(entry.calories_consumed, 900);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM daily_entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_partial_upsert_preserves_other_fields() {
        let conn = test_conn();

        DailyEntry::upsert(
            &conn,
            1,
            "2026-08-15",
            &DailyEntryUpdate {
                calories_consumed: Some(1500),
                steps_taken: Some(8000),
                ..Default::default()
            },
        )
        .unwrap();

        let entry = DailyEntry::upsert(
            &conn,
            1,
            "2026-08-15",
            &DailyEntryUpdate {
                gym_calories: Some(200),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(entry.calories_consumed, 1500);
        assert_eq!(entry.steps_taken, 8000);
        assert_eq!(entry.gym_calories, 200);
    }

    #[test]
    fn test_derived_totals() {
        let conn = test_conn();
        let entry = DailyEntry::get_or_create(&conn, 1, "2026-08-15").unwrap();
        // Fresh day: nothing logged, nothing burned
        assert_eq!(entry.total_burned(), 0);

        let entry = DailyEntry::upsert(
            &conn,
            1,
            "2026-08-15",
            &DailyEntryUpdate {
                steps_taken: Some(10_000),
                gym_calories: Some(150),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(entry.step_calories(), 400);
        assert_eq!(entry.total_burned(), 550);
    }

    #[test]
    fn test_adjustment_accumulates_deltas() {
        let conn = test_conn();
        let entry = DailyEntry::get_or_create(&conn, 1, "2026-08-15").unwrap();
        assert_eq!(entry.adjustment, None);

        // First burn of 50, then revised down to 30: net +30
        let entry = DailyEntry::apply_exercise_burn(&conn, entry.id, 50)
            .unwrap()
            .unwrap();
        assert_eq!(entry.exercise_calories, 50);
        assert_eq!(entry.adjustment, Some(50));

        let entry = DailyEntry::apply_exercise_burn(&conn, entry.id, 30)
            .unwrap()
            .unwrap();
        assert_eq!(entry.exercise_calories, 30);
        assert_eq!(entry.adjustment, Some(30));

        // Re-saving the same burn moves nothing
        let entry = DailyEntry::apply_exercise_burn(&conn, entry.id, 30)
            .unwrap()
            .unwrap();
        assert_eq!(entry.adjustment, Some(30));
    }

    #[test]
    fn test_month_listing() {
        let conn = test_conn();
        for date in ["2026-07-31", "2026-08-01", "2026-08-20", "2026-09-01"] {
            DailyEntry::get_or_create(&conn, 1, date).unwrap();
        }
        // Another profile's August does not leak in
        DailyEntry::get_or_create(&conn, 2, "2026-08-05").unwrap();

        let august = DailyEntry::list_for_month(&conn, 1, 2026, 8).unwrap();
        let dates: Vec<&str> = august.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-08-01", "2026-08-20"]);
    }
}
