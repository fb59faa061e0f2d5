//! MacroTrack status tool
//!
//! Provides runtime status information about the MacroTrack service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::Database;
use crate::models::Exercise;

/// Tracking instructions for AI assistants
pub const TRACKING_INSTRUCTIONS: &str = r#"
# MacroTrack Tracking Instructions

This guide explains how to track calories, steps, and workouts with the
MacroTrack tools.

## Profiles

Everything is tracked per profile. Create one with `create_profile`
(weight kg, height cm, age, sex, activity level 0-4, goal 0-2):

- Activity levels: 0 sedentary, 1 lightly active, 2 moderately active,
  3 very active, 4 super active.
- Goals: 0 maintain, 1 gain (+300 kcal/day), 2 lose (-300 kcal/day).

`get_calorie_targets` returns the BMR, TDEE, and daily calorie goal the
summaries are measured against.

## Daily logging

One entry exists per profile per calendar day; every write for the same
(profile, date) updates that entry in place.

1. `log_day` - record calories eaten, steps, and manual gym/cardio burn.
   Only the fields you pass change.
2. `import_steps` - overwrite the day's step count from an external
   source (phone/watch export).
3. `get_day_summary` - goal, burn breakdown, and signed calories
   remaining for the day.

## Workouts

1. Find catalog exercises with `search_exercises` (the MET value drives
   the burn calculation).
2. `log_workout` replaces the whole day's exercise list. Pass detailed
   `workout_sets` (weight kg, reps, tempo slow/normal/fast/stop_and_go,
   rest seconds) for the per-set model, or just `sets` for the simple
   one-minute-per-set estimate.
3. `estimate_workout_energy` previews the burn without saving.

Dates are ISO format (YYYY-MM-DD). Use `get_month_summary` for calendar
rollups including average steps.
"#;

/// Current service status
#[derive(Debug, Serialize)]
pub struct MacroTrackStatus {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: i32,
    pub profile_count: i64,
    pub entry_count: i64,
    pub catalog_count: i64,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks service start time for status reporting
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, db: &Database) -> Result<MacroTrackStatus, String> {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
        let schema_version = crate::db::migrations::get_schema_version(&conn)
            .map_err(|e| format!("Failed to read schema version: {}", e))?;
        let profile_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))
            .map_err(|e| format!("Failed to count profiles: {}", e))?;
        let entry_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM daily_entries", [], |row| row.get(0))
            .map_err(|e| format!("Failed to count entries: {}", e))?;
        let catalog_count = Exercise::count(&conn)
            .map_err(|e| format!("Failed to count catalog: {}", e))?;

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        Ok(MacroTrackStatus {
            version: build_info.version,
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            profile_count,
            entry_count,
            catalog_count,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        })
    }
}
