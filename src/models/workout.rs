//! Logged workout models
//!
//! User exercises and their per-set detail, attached to a daily entry. A
//! logged exercise either carries detailed workout sets or falls back to its
//! sets/reps/weight defaults for the simple estimate.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::energy::{self, ExerciseLog, SetEffort, SetTempo};
use crate::models::{DailyEntry, Exercise, Profile};

/// A logged instance of a catalog exercise within a day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserExercise {
    pub id: i64,
    pub entry_id: i64,
    pub exercise_id: i64,
    pub position: i64,
    /// Defaults used when no detailed per-set data exists
    pub sets: i64,
    pub reps: i64,
    pub weight_kg: f64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// One set within a logged exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: i64,
    pub user_exercise_id: i64,
    pub set_order: i64,
    pub weight_kg: f64,
    pub reps: i64,
    pub tempo: SetTempo,
    pub rest_seconds: i64,
}

/// Data for logging an exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserExerciseCreate {
    pub exercise_id: i64,
    pub sets: i64,
    pub reps: i64,
    pub weight_kg: f64,
    pub notes: Option<String>,
    /// Detailed sets; when absent the simple estimate applies
    pub workout_sets: Option<Vec<WorkoutSetCreate>>,
}

/// Data for one set of a logged exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSetCreate {
    pub weight_kg: f64,
    pub reps: i64,
    pub tempo: SetTempo,
    pub rest_seconds: i64,
}

impl Default for WorkoutSetCreate {
    fn default() -> Self {
        Self {
            weight_kg: 0.0,
            reps: 8,
            tempo: SetTempo::Normal,
            rest_seconds: 60,
        }
    }
}

impl WorkoutSet {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let tempo_str: String = row.get("tempo")?;
        let tempo = SetTempo::from_str(&tempo_str).unwrap_or_default();

        Ok(Self {
            id: row.get("id")?,
            user_exercise_id: row.get("user_exercise_id")?,
            set_order: row.get("set_order")?,
            weight_kg: row.get("weight_kg")?,
            reps: row.get("reps")?,
            tempo,
            rest_seconds: row.get("rest_seconds")?,
        })
    }

    /// The effort values the energy model consumes
    pub fn effort(&self) -> SetEffort {
        SetEffort {
            weight_kg: self.weight_kg,
            reps: self.reps,
            tempo: self.tempo,
            rest_seconds: self.rest_seconds,
        }
    }

    /// List sets for a logged exercise, in set order
    pub fn list_for_exercise(conn: &Connection, user_exercise_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM workout_sets WHERE user_exercise_id = ?1 ORDER BY set_order",
        )?;
        let sets = stmt
            .query_map([user_exercise_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sets)
    }
}

impl UserExercise {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            entry_id: row.get("entry_id")?,
            exercise_id: row.get("exercise_id")?,
            position: row.get("position")?,
            sets: row.get("sets")?,
            reps: row.get("reps")?,
            weight_kg: row.get("weight_kg")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// List logged exercises for an entry, in logged order
    pub fn list_for_entry(conn: &Connection, entry_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM user_exercises WHERE entry_id = ?1 ORDER BY position")?;
        let exercises = stmt
            .query_map([entry_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(exercises)
    }

    /// Replace the logged exercises for an entry with a new list. Old rows
    /// (and their sets, via cascade) are removed first.
    pub fn replace_for_entry(
        conn: &Connection,
        entry_id: i64,
        exercises: &[UserExerciseCreate],
    ) -> DbResult<Vec<Self>> {
        conn.execute("DELETE FROM user_exercises WHERE entry_id = ?1", [entry_id])?;

        for (position, data) in exercises.iter().enumerate() {
            conn.execute(
                r#"
                INSERT INTO user_exercises (entry_id, exercise_id, position, sets, reps, weight_kg, notes)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    entry_id,
                    data.exercise_id,
                    position as i64,
                    data.sets,
                    data.reps,
                    data.weight_kg,
                    data.notes,
                ],
            )?;
            let user_exercise_id = conn.last_insert_rowid();

            if let Some(ref sets) = data.workout_sets {
                for (order, set) in sets.iter().enumerate() {
                    conn.execute(
                        r#"
                        INSERT INTO workout_sets
                            (user_exercise_id, set_order, weight_kg, reps, tempo, rest_seconds)
                        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                        "#,
                        params![
                            user_exercise_id,
                            order as i64 + 1,
                            set.weight_kg,
                            set.reps,
                            set.tempo.to_db_str(),
                            set.rest_seconds,
                        ],
                    )?;
                }
            }
        }

        Self::list_for_entry(conn, entry_id)
    }

    /// Energy burned by this logged exercise in kcal. Detailed sets win over
    /// the sets/reps defaults when present.
    pub fn burn(&self, conn: &Connection, met: f64, body_weight_kg: f64) -> DbResult<i64> {
        let sets = WorkoutSet::list_for_exercise(conn, self.id)?;
        let burn = if sets.is_empty() {
            energy::exercise_energy(&ExerciseLog::Simple { sets: self.sets }, met, body_weight_kg)
        } else {
            let efforts: Vec<SetEffort> = sets.iter().map(WorkoutSet::effort).collect();
            energy::exercise_energy(&ExerciseLog::Detailed(&efforts), met, body_weight_kg)
        };
        Ok(burn)
    }
}

/// Total exercise burn for an entry, summed over its logged exercises.
/// Exercises whose catalog entry has disappeared contribute nothing.
pub fn compute_entry_burn(conn: &Connection, entry_id: i64, body_weight_kg: f64) -> DbResult<i64> {
    let mut total = 0;
    for user_exercise in UserExercise::list_for_entry(conn, entry_id)? {
        match Exercise::get_by_id(conn, user_exercise.exercise_id)? {
            Some(exercise) => {
                total += user_exercise.burn(conn, exercise.met, body_weight_kg)?;
            }
            None => {
                tracing::warn!(
                    "logged exercise {} references missing catalog id {}, skipping",
                    user_exercise.id,
                    user_exercise.exercise_id
                );
            }
        }
    }
    Ok(total)
}

/// Recompute an entry's exercise burn from its stored sets and fold the
/// change into the adjustment accumulator. Returns the updated entry, or
/// None when the entry or its profile no longer exists.
pub fn recalculate_entry_exercise_burn(
    conn: &Connection,
    entry_id: i64,
) -> DbResult<Option<DailyEntry>> {
    let entry = match DailyEntry::get_by_id(conn, entry_id)? {
        Some(e) => e,
        None => return Ok(None),
    };
    let profile = match Profile::get_by_id(conn, entry.profile_id)? {
        Some(p) => p,
        None => return Ok(None),
    };

    let burn = compute_entry_burn(conn, entry_id, profile.weight_kg)?;
    DailyEntry::apply_exercise_burn(conn, entry_id, burn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::energy::{ActivityLevel, Goal};
    use crate::models::{ExerciseSeed, ProfileCreate};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn seed_exercise(conn: &Connection, id: i64, met: f64) {
        Exercise::seed(
            conn,
            &[ExerciseSeed {
                id,
                uuid: format!("uuid-{}", id),
                name: format!("Exercise {}", id),
                description: None,
                category: "Strength".to_string(),
                met,
                muscles: vec![],
                muscles_secondary: vec![],
                equipment: vec![],
            }],
        )
        .unwrap();
    }

    fn seed_profile(conn: &Connection) -> Profile {
        Profile::create(
            conn,
            &ProfileCreate {
                name: "Alex".to_string(),
                weight_kg: 70.0,
                height_cm: 175.0,
                age: 30,
                is_male: true,
                activity_level: ActivityLevel::Sedentary,
                goal: Goal::Maintain,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_replace_round_trip() {
        let conn = test_conn();
        seed_exercise(&conn, 100, 3.0);
        let entry = DailyEntry::get_or_create(&conn, 1, "2026-08-15").unwrap();

        let logged = UserExercise::replace_for_entry(
            &conn,
            entry.id,
            &[UserExerciseCreate {
                exercise_id: 100,
                sets: 3,
                reps: 10,
                weight_kg: 0.0,
                notes: Some("felt good".to_string()),
                workout_sets: Some(vec![
                    WorkoutSetCreate { weight_kg: 40.0, reps: 10, tempo: SetTempo::Slow, rest_seconds: 90 },
                    WorkoutSetCreate::default(),
                ]),
            }],
        )
        .unwrap();

        assert_eq!(logged.len(), 1);
        let sets = WorkoutSet::list_for_exercise(&conn, logged[0].id).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].tempo, SetTempo::Slow);
        assert_eq!(sets[1].reps, 8);

        // Replacing again drops the old rows
        UserExercise::replace_for_entry(&conn, entry.id, &[]).unwrap();
        assert!(UserExercise::list_for_entry(&conn, entry.id).unwrap().is_empty());
        let orphaned: i64 = conn
            .query_row("SELECT COUNT(*) FROM workout_sets", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphaned, 0);
    }

    #[test]
    fn test_entry_burn_uses_detail_over_defaults() {
        let conn = test_conn();
        seed_exercise(&conn, 100, 3.0);
        let entry = DailyEntry::get_or_create(&conn, 1, "2026-08-15").unwrap();

        // Simple estimate only: 3 sets at MET 3.0, 70kg -> trunc(3*70*3/60) = 10
        UserExercise::replace_for_entry(
            &conn,
            entry.id,
            &[UserExerciseCreate {
                exercise_id: 100,
                sets: 3,
                reps: 10,
                weight_kg: 0.0,
                notes: None,
                workout_sets: None,
            }],
        )
        .unwrap();
        assert_eq!(compute_entry_burn(&conn, entry.id, 70.0).unwrap(), 10);

        // With detailed sets the per-set model takes over
        UserExercise::replace_for_entry(
            &conn,
            entry.id,
            &[UserExerciseCreate {
                exercise_id: 100,
                sets: 3,
                reps: 10,
                weight_kg: 0.0,
                notes: None,
                workout_sets: Some(vec![
                    WorkoutSetCreate { reps: 10, ..Default::default() },
                    WorkoutSetCreate { reps: 10, ..Default::default() },
                ]),
            }],
        )
        .unwrap();
        // First set with rest: trunc(1.75 + 1.5167) = 3, last without: 1
        assert_eq!(compute_entry_burn(&conn, entry.id, 70.0).unwrap(), 4);
    }

    #[test]
    fn test_recalculate_applies_delta() {
        let conn = test_conn();
        seed_exercise(&conn, 100, 3.0);
        let profile = seed_profile(&conn);
        let entry = DailyEntry::get_or_create(&conn, profile.id, "2026-08-15").unwrap();

        UserExercise::replace_for_entry(
            &conn,
            entry.id,
            &[UserExerciseCreate {
                exercise_id: 100,
                sets: 6,
                reps: 10,
                weight_kg: 0.0,
                notes: None,
                workout_sets: None,
            }],
        )
        .unwrap();

        // First recalc: burn trunc(3*70*6/60) = 21, adjustment starts at +21
        let updated = recalculate_entry_exercise_burn(&conn, entry.id).unwrap().unwrap();
        assert_eq!(updated.exercise_calories, 21);
        assert_eq!(updated.adjustment, Some(21));

        // Recalc with unchanged data is a no-op
        let updated = recalculate_entry_exercise_burn(&conn, entry.id).unwrap().unwrap();
        assert_eq!(updated.adjustment, Some(21));
    }
}
