//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILES
        -- Body metrics and targets for one user
        -- ============================================
        CREATE TABLE profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            weight_kg REAL NOT NULL,
            height_cm REAL NOT NULL,
            age INTEGER NOT NULL,
            is_male INTEGER NOT NULL DEFAULT 1,      -- boolean, selects BMR formula branch
            activity_level INTEGER NOT NULL DEFAULT 0 CHECK(activity_level BETWEEN 0 AND 4),
            goal INTEGER NOT NULL DEFAULT 0 CHECK(goal BETWEEN 0 AND 2),

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_profiles_name ON profiles(name);

        -- ============================================
        -- DAILY ENTRIES
        -- One record per (profile, calendar day)
        -- ============================================
        -- profile_id is deliberately NOT a foreign key: deleting a profile
        -- leaves its entries in place (no cascading deletion).
        CREATE TABLE daily_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            profile_id INTEGER NOT NULL,
            date TEXT NOT NULL,                      -- ISO date: "2025-01-09"

            calories_consumed INTEGER NOT NULL DEFAULT 0,
            steps_taken INTEGER NOT NULL DEFAULT 0,
            gym_calories INTEGER NOT NULL DEFAULT 0,     -- user-entered gym/cardio burn
            exercise_calories INTEGER NOT NULL DEFAULT 0, -- derived from logged workouts
            adjustment INTEGER,                      -- delta-accumulated calorie availability

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(profile_id, date)                 -- at most one entry per profile per day
        );

        CREATE INDEX idx_daily_entries_profile ON daily_entries(profile_id);
        CREATE INDEX idx_daily_entries_date ON daily_entries(date);

        -- ============================================
        -- EXERCISES
        -- Read-only catalog with MET coefficients
        -- ============================================
        CREATE TABLE exercises (
            id INTEGER PRIMARY KEY,                  -- catalog id, not autoincrement
            uuid TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            category TEXT NOT NULL,
            met REAL NOT NULL,                       -- metabolic equivalent, typically 1-12
            muscles TEXT NOT NULL DEFAULT '[]',      -- JSON array of muscle ids
            muscles_secondary TEXT NOT NULL DEFAULT '[]',
            equipment TEXT NOT NULL DEFAULT '[]'     -- JSON array of equipment ids
        );

        CREATE INDEX idx_exercises_name ON exercises(name);
        CREATE INDEX idx_exercises_category ON exercises(category);

        -- ============================================
        -- USER EXERCISES
        -- Logged catalog exercises within a daily entry
        -- ============================================
        CREATE TABLE user_exercises (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id INTEGER NOT NULL REFERENCES daily_entries(id) ON DELETE CASCADE,
            exercise_id INTEGER NOT NULL REFERENCES exercises(id) ON DELETE RESTRICT,
            position INTEGER NOT NULL DEFAULT 0,     -- order within the day

            -- Defaults used when no detailed per-set data exists
            sets INTEGER NOT NULL DEFAULT 3,
            reps INTEGER NOT NULL DEFAULT 10,
            weight_kg REAL NOT NULL DEFAULT 0,

            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_user_exercises_entry ON user_exercises(entry_id);
        CREATE INDEX idx_user_exercises_exercise ON user_exercises(exercise_id);

        -- ============================================
        -- WORKOUT SETS
        -- One set within a logged exercise
        -- ============================================
        CREATE TABLE workout_sets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_exercise_id INTEGER NOT NULL REFERENCES user_exercises(id) ON DELETE CASCADE,
            set_order INTEGER NOT NULL,

            weight_kg REAL NOT NULL DEFAULT 0,
            reps INTEGER NOT NULL DEFAULT 8,
            tempo TEXT NOT NULL DEFAULT 'normal' CHECK(tempo IN ('slow', 'normal', 'fast', 'stop_and_go')),
            rest_seconds INTEGER NOT NULL DEFAULT 60,

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_workout_sets_user_exercise ON workout_sets(user_exercise_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
