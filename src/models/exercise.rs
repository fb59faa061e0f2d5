//! Exercise catalog model
//!
//! Read-only reference data: exercises with MET coefficients, seeded from a
//! bundled JSON catalog. The computation layer only ever reads `met`; the
//! muscle/equipment ids ride along for display.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Bundled default catalog, loaded when no external file is given
pub const DEFAULT_CATALOG_JSON: &str = include_str!("../../data/exercises.json");

/// A catalog exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    /// Metabolic equivalent coefficient, typically 1-12
    pub met: f64,
    pub muscles: Vec<i64>,
    pub muscles_secondary: Vec<i64>,
    pub equipment: Vec<i64>,
}

/// Catalog entry as it appears in the seed JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSeed {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub met: f64,
    #[serde(default)]
    pub muscles: Vec<i64>,
    #[serde(default, rename = "muscles_secondary")]
    pub muscles_secondary: Vec<i64>,
    #[serde(default)]
    pub equipment: Vec<i64>,
}

fn decode_ids(json: &str) -> Vec<i64> {
    serde_json::from_str(json).unwrap_or_default()
}

impl Exercise {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let muscles: String = row.get("muscles")?;
        let muscles_secondary: String = row.get("muscles_secondary")?;
        let equipment: String = row.get("equipment")?;

        Ok(Self {
            id: row.get("id")?,
            uuid: row.get("uuid")?,
            name: row.get("name")?,
            description: row.get("description")?,
            category: row.get("category")?,
            met: row.get("met")?,
            muscles: decode_ids(&muscles),
            muscles_secondary: decode_ids(&muscles_secondary),
            equipment: decode_ids(&equipment),
        })
    }

    /// Get an exercise by catalog ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(exercise) => Ok(Some(exercise)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List the catalog, alphabetically
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM exercises ORDER BY name LIMIT ?1 OFFSET ?2")?;
        let exercises = stmt
            .query_map(params![limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(exercises)
    }

    /// Search exercises by name
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let pattern = format!("%{}%", query);
        let mut stmt = conn.prepare(
            "SELECT * FROM exercises WHERE name LIKE ?1 ORDER BY name LIMIT ?2",
        )?;
        let exercises = stmt
            .query_map(params![pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(exercises)
    }

    /// Number of catalog entries
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM exercises", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Seed the catalog from parsed entries. Existing ids are updated in
    /// place rather than replaced, so re-seeding never deletes a row that a
    /// logged workout still references.
    pub fn seed(conn: &Connection, entries: &[ExerciseSeed]) -> DbResult<usize> {
        let mut stmt = conn.prepare(
            r#"
            INSERT INTO exercises
                (id, uuid, name, description, category, met, muscles, muscles_secondary, equipment)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                uuid = excluded.uuid,
                name = excluded.name,
                description = excluded.description,
                category = excluded.category,
                met = excluded.met,
                muscles = excluded.muscles,
                muscles_secondary = excluded.muscles_secondary,
                equipment = excluded.equipment
            "#,
        )?;

        for entry in entries {
            stmt.execute(params![
                entry.id,
                entry.uuid,
                entry.name,
                entry.description,
                entry.category,
                entry.met,
                serde_json::to_string(&entry.muscles).unwrap_or_else(|_| "[]".to_string()),
                serde_json::to_string(&entry.muscles_secondary)
                    .unwrap_or_else(|_| "[]".to_string()),
                serde_json::to_string(&entry.equipment).unwrap_or_else(|_| "[]".to_string()),
            ])?;
        }

        Ok(entries.len())
    }

    /// Seed the catalog from a JSON document (an array of entries)
    pub fn seed_from_json(conn: &Connection, json: &str) -> DbResult<usize> {
        let entries: Vec<ExerciseSeed> = serde_json::from_str(json)
            .map_err(|e| DbError::Catalog(format!("invalid catalog JSON: {}", e)))?;
        Self::seed(conn, &entries)
    }

    /// Seed the bundled default catalog when the table is empty
    pub fn seed_defaults_if_empty(conn: &Connection) -> DbResult<usize> {
        if Self::count(conn)? > 0 {
            return Ok(0);
        }
        Self::seed_from_json(conn, DEFAULT_CATALOG_JSON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_seed_bundled_catalog() {
        let conn = test_conn();
        let seeded = Exercise::seed_defaults_if_empty(&conn).unwrap();
        assert!(seeded > 0);
        assert_eq!(Exercise::count(&conn).unwrap(), seeded as i64);

        // Second call is a no-op
        assert_eq!(Exercise::seed_defaults_if_empty(&conn).unwrap(), 0);
    }

    #[test]
    fn test_search_by_name() {
        let conn = test_conn();
        Exercise::seed_defaults_if_empty(&conn).unwrap();

        let results = Exercise::search(&conn, "squat", 10).unwrap();
        assert!(!results.is_empty());
        for exercise in &results {
            assert!(exercise.name.to_lowercase().contains("squat"));
            assert!(exercise.met > 0.0);
        }
    }

    #[test]
    fn test_reseed_keeps_referenced_rows() {
        let conn = test_conn();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();

        let entry = ExerciseSeed {
            id: 100,
            uuid: "uuid-100".to_string(),
            name: "Barbell Row".to_string(),
            description: None,
            category: "Back".to_string(),
            met: 6.0,
            muscles: vec![],
            muscles_secondary: vec![],
            equipment: vec![],
        };
        Exercise::seed(&conn, &[entry.clone()]).unwrap();

        // A logged workout holds a RESTRICT reference to the catalog row
        conn.execute(
            "INSERT INTO daily_entries (profile_id, date) VALUES (1, '2026-08-15')",
            [],
        )
        .unwrap();
        let entry_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO user_exercises (entry_id, exercise_id) VALUES (?1, 100)",
            [entry_id],
        )
        .unwrap();

        // Re-seeding must update in place, not delete-and-reinsert
        let mut updated = entry;
        updated.met = 7.0;
        Exercise::seed(&conn, &[updated]).unwrap();

        let fetched = Exercise::get_by_id(&conn, 100).unwrap().unwrap();
        assert_eq!(fetched.met, 7.0);
        let references: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM user_exercises WHERE exercise_id = 100",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(references, 1);
    }

    #[test]
    fn test_reseed_updates_values() {
        let conn = test_conn();
        let entry = ExerciseSeed {
            id: 9001,
            uuid: "test-uuid".to_string(),
            name: "Test Press".to_string(),
            description: None,
            category: "Chest".to_string(),
            met: 4.0,
            muscles: vec![1, 2],
            muscles_secondary: vec![],
            equipment: vec![3],
        };
        Exercise::seed(&conn, &[entry.clone()]).unwrap();

        let mut updated = entry;
        updated.met = 5.5;
        Exercise::seed(&conn, &[updated]).unwrap();

        let fetched = Exercise::get_by_id(&conn, 9001).unwrap().unwrap();
        assert_eq!(fetched.met, 5.5);
        assert_eq!(fetched.muscles, vec![1, 2]);
        assert_eq!(Exercise::count(&conn).unwrap(), 1);
    }
}
