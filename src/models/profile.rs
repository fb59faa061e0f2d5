//! Profile model
//!
//! A user's body metrics and targets. Deleting a profile leaves its daily
//! entries in place; there is no cascading cleanup.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::energy::{ActivityLevel, Goal};

/// A user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: i64,
    pub is_male: bool,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileCreate {
    pub name: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: i64,
    pub is_male: bool,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Data for updating a profile in place
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<i64>,
    pub is_male: Option<bool>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
}

impl Profile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        // Stored indices are CHECK-constrained, but decode defensively the
        // same way older rows would be read
        let activity_level = ActivityLevel::from_index(row.get("activity_level")?)
            .unwrap_or(ActivityLevel::Sedentary);
        let goal = Goal::from_index(row.get("goal")?).unwrap_or(Goal::Maintain);

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            weight_kg: row.get("weight_kg")?,
            height_cm: row.get("height_cm")?,
            age: row.get("age")?,
            is_male: row.get::<_, i64>("is_male")? != 0,
            activity_level,
            goal,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new profile
    pub fn create(conn: &Connection, data: &ProfileCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO profiles (name, weight_kg, height_cm, age, is_male, activity_level, goal)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.name,
                data.weight_kg,
                data.height_cm,
                data.age,
                data.is_male as i64,
                data.activity_level.as_index(),
                data.goal.as_index(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a profile by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all profiles
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles ORDER BY name, id")?;
        let profiles = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(profiles)
    }

    /// Update a profile in place
    pub fn update(conn: &Connection, id: i64, data: &ProfileUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(weight_kg) = data.weight_kg {
            updates.push(format!("weight_kg = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(weight_kg));
        }
        if let Some(height_cm) = data.height_cm {
            updates.push(format!("height_cm = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(height_cm));
        }
        if let Some(age) = data.age {
            updates.push(format!("age = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(age));
        }
        if let Some(is_male) = data.is_male {
            updates.push(format!("is_male = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(is_male as i64));
        }
        if let Some(activity_level) = data.activity_level {
            updates.push(format!("activity_level = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(activity_level.as_index()));
        }
        if let Some(goal) = data.goal {
            updates.push(format!("goal = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(goal.as_index()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE profiles SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete a profile. Daily entries for the profile are untouched and
    /// remain readable by id.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM profiles WHERE id = ?1", [id])?;
        Ok(rows > 0)
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

    fn sample() -> ProfileCreate {
        ProfileCreate {
            name: "Alex".to_string(),
            weight_kg: 70.0,
            height_cm: 175.0,
            age: 30,
            is_male: true,
            activity_level: ActivityLevel::ModeratelyActive,
            goal: Goal::Lose,
        }
    }

    #[test]
    fn test_create_and_get() {
        let conn = test_conn();
        let profile = Profile::create(&conn, &sample()).unwrap();
        assert_eq!(profile.name, "Alex");
        assert_eq!(profile.activity_level, ActivityLevel::ModeratelyActive);
        assert_eq!(profile.goal, Goal::Lose);

        let fetched = Profile::get_by_id(&conn, profile.id).unwrap().unwrap();
        assert_eq!(fetched.weight_kg, 70.0);
        assert!(fetched.is_male);
    }

    #[test]
    fn test_update_in_place() {
        let conn = test_conn();
        let profile = Profile::create(&conn, &sample()).unwrap();

        let updated = Profile::update(
            &conn,
            profile.id,
            &ProfileUpdate {
                weight_kg: Some(68.5),
                goal: Some(Goal::Maintain),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.weight_kg, 68.5);
        assert_eq!(updated.goal, Goal::Maintain);
        assert_eq!(updated.name, "Alex");
    }

    #[test]
    fn test_delete_leaves_entries() {
        let conn = test_conn();
        let profile = Profile::create(&conn, &sample()).unwrap();
        conn.execute(
            "INSERT INTO daily_entries (profile_id, date) VALUES (?1, '2026-08-01')",
            [profile.id],
        )
        .unwrap();

        assert!(Profile::delete(&conn, profile.id).unwrap());
        assert!(Profile::get_by_id(&conn, profile.id).unwrap().is_none());

        // Orphaned entry survives
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM daily_entries WHERE profile_id = ?1",
                [profile.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
