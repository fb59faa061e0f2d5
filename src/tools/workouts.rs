//! Workout MCP tools
//!
//! Logging a day's exercises, previewing their energy cost, and
//! recalculating the stored burn.

use serde::Serialize;

use crate::db::Database;
use crate::models::{
    compute_entry_burn, recalculate_entry_exercise_burn, DailyEntry, Exercise, Profile,
    UserExercise, UserExerciseCreate, WorkoutSet,
};

/// Burn breakdown for one logged exercise
#[derive(Debug, Serialize)]
pub struct LoggedExerciseDetail {
    pub exercise_id: i64,
    pub name: String,
    pub met: f64,
    pub set_count: usize,
    /// True when the simple sets-as-minutes estimate was used
    pub estimated: bool,
    pub burn: i64,
}

/// Response for log_workout
#[derive(Debug, Serialize)]
pub struct LogWorkoutResponse {
    pub entry_id: i64,
    pub profile_id: i64,
    pub date: String,
    pub exercises: Vec<LoggedExerciseDetail>,
    pub exercise_burn: i64,
    pub previous_burn: i64,
    /// Delta-accumulated calorie availability after this save
    pub adjustment: i64,
}

/// A logged exercise with its stored sets
#[derive(Debug, Serialize)]
pub struct WorkoutExerciseView {
    pub user_exercise: UserExercise,
    pub exercise_name: String,
    pub met: f64,
    pub workout_sets: Vec<WorkoutSet>,
    pub burn: i64,
}

/// Response for get_workout
#[derive(Debug, Serialize)]
pub struct WorkoutResponse {
    pub profile_id: i64,
    pub date: String,
    pub exercises: Vec<WorkoutExerciseView>,
    pub exercise_burn: i64,
}

/// Response for estimate_workout_energy (nothing persisted)
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub profile_id: i64,
    pub body_weight_kg: f64,
    pub exercises: Vec<LoggedExerciseDetail>,
    pub total_burn: i64,
}

/// Response for recalculate_burn
#[derive(Debug, Serialize)]
pub struct RecalculateBurnResponse {
    pub entry_id: i64,
    pub date: String,
    pub previous_burn: i64,
    pub exercise_burn: i64,
    pub adjustment: i64,
}

fn load_profile(db: &Database, profile_id: i64) -> Result<Profile, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Profile::get_by_id(&conn, profile_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| format!("Profile not found: {}", profile_id))
}

/// Check that every referenced catalog exercise exists, returning them in
/// call order
fn resolve_catalog(
    conn: &rusqlite::Connection,
    exercises: &[UserExerciseCreate],
) -> Result<Vec<Exercise>, String> {
    let mut resolved = Vec::with_capacity(exercises.len());
    for data in exercises {
        let exercise = Exercise::get_by_id(conn, data.exercise_id)
            .map_err(|e| format!("Failed to read catalog: {}", e))?
            .ok_or_else(|| format!("Unknown exercise id: {}", data.exercise_id))?;
        resolved.push(exercise);
    }
    Ok(resolved)
}

/// Replace the day's logged exercises, recompute the exercise burn, and fold
/// the burn change into the entry's adjustment accumulator
pub fn log_workout(
    db: &Database,
    profile_id: i64,
    date: &str,
    exercises: Vec<UserExerciseCreate>,
) -> Result<LogWorkoutResponse, String> {
    super::tracking::check_date(date)?;
    let profile = load_profile(db, profile_id)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let catalog = resolve_catalog(&conn, &exercises)?;

    let entry = DailyEntry::get_or_create(&conn, profile_id, date)
        .map_err(|e| format!("Failed to open entry: {}", e))?;
    let previous_burn = entry.exercise_calories;

    let logged = UserExercise::replace_for_entry(&conn, entry.id, &exercises)
        .map_err(|e| format!("Failed to save workout: {}", e))?;

    let mut details = Vec::with_capacity(logged.len());
    let mut total = 0;
    for (user_exercise, exercise) in logged.iter().zip(catalog.iter()) {
        let sets = WorkoutSet::list_for_exercise(&conn, user_exercise.id)
            .map_err(|e| format!("Failed to read sets: {}", e))?;
        let burn = user_exercise
            .burn(&conn, exercise.met, profile.weight_kg)
            .map_err(|e| format!("Failed to compute burn: {}", e))?;
        total += burn;
        details.push(LoggedExerciseDetail {
            exercise_id: exercise.id,
            name: exercise.name.clone(),
            met: exercise.met,
            set_count: sets.len(),
            estimated: sets.is_empty(),
            burn,
        });
    }

    let entry = DailyEntry::apply_exercise_burn(&conn, entry.id, total)
        .map_err(|e| format!("Failed to apply burn: {}", e))?
        .ok_or_else(|| "Entry disappeared while saving".to_string())?;

    Ok(LogWorkoutResponse {
        entry_id: entry.id,
        profile_id,
        date: entry.date.clone(),
        exercises: details,
        exercise_burn: entry.exercise_calories,
        previous_burn,
        adjustment: entry.adjustment.unwrap_or(0),
    })
}

/// The logged workout for a day with per-exercise burn
pub fn get_workout(db: &Database, profile_id: i64, date: &str) -> Result<WorkoutResponse, String> {
    super::tracking::check_date(date)?;
    let profile = load_profile(db, profile_id)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entry = DailyEntry::get(&conn, profile_id, date)
        .map_err(|e| format!("Failed to get entry: {}", e))?;

    let mut views = Vec::new();
    let mut total = 0;
    if let Some(ref entry) = entry {
        for user_exercise in UserExercise::list_for_entry(&conn, entry.id)
            .map_err(|e| format!("Failed to list workout: {}", e))?
        {
            let exercise = Exercise::get_by_id(&conn, user_exercise.exercise_id)
                .map_err(|e| format!("Failed to read catalog: {}", e))?;
            let (name, met) = match exercise {
                Some(e) => (e.name, e.met),
                None => ("(removed from catalog)".to_string(), 0.0),
            };
            let workout_sets = WorkoutSet::list_for_exercise(&conn, user_exercise.id)
                .map_err(|e| format!("Failed to read sets: {}", e))?;
            let burn = user_exercise
                .burn(&conn, met, profile.weight_kg)
                .map_err(|e| format!("Failed to compute burn: {}", e))?;
            total += burn;
            views.push(WorkoutExerciseView {
                user_exercise,
                exercise_name: name,
                met,
                workout_sets,
                burn,
            });
        }
    }

    Ok(WorkoutResponse {
        profile_id,
        date: date.to_string(),
        exercises: views,
        exercise_burn: total,
    })
}

/// Pure preview: compute what a workout would burn for a profile without
/// writing anything
pub fn estimate_workout_energy(
    db: &Database,
    profile_id: i64,
    exercises: Vec<UserExerciseCreate>,
) -> Result<EstimateResponse, String> {
    use crate::energy::{self, ExerciseLog, SetEffort};

    let profile = load_profile(db, profile_id)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let catalog = resolve_catalog(&conn, &exercises)?;

    let mut details = Vec::with_capacity(exercises.len());
    let mut total = 0;
    for (data, exercise) in exercises.iter().zip(catalog.iter()) {
        let burn = match data.workout_sets {
            Some(ref sets) if !sets.is_empty() => {
                let efforts: Vec<SetEffort> = sets
                    .iter()
                    .map(|s| SetEffort {
                        weight_kg: s.weight_kg,
                        reps: s.reps,
                        tempo: s.tempo,
                        rest_seconds: s.rest_seconds,
                    })
                    .collect();
                energy::exercise_energy(
                    &ExerciseLog::Detailed(&efforts),
                    exercise.met,
                    profile.weight_kg,
                )
            }
            _ => energy::exercise_energy(
                &ExerciseLog::Simple { sets: data.sets },
                exercise.met,
                profile.weight_kg,
            ),
        };
        total += burn;
        details.push(LoggedExerciseDetail {
            exercise_id: exercise.id,
            name: exercise.name.clone(),
            met: exercise.met,
            set_count: data.workout_sets.as_ref().map(|s| s.len()).unwrap_or(0),
            estimated: data.workout_sets.as_ref().map(|s| s.is_empty()).unwrap_or(true),
            burn,
        });
    }

    Ok(EstimateResponse {
        profile_id,
        body_weight_kg: profile.weight_kg,
        exercises: details,
        total_burn: total,
    })
}

/// Recompute the day's exercise burn from its stored sets and apply the
/// delta to the adjustment accumulator
pub fn recalculate_burn(
    db: &Database,
    profile_id: i64,
    date: &str,
) -> Result<RecalculateBurnResponse, String> {
    super::tracking::check_date(date)?;
    load_profile(db, profile_id)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entry = DailyEntry::get(&conn, profile_id, date)
        .map_err(|e| format!("Failed to get entry: {}", e))?
        .ok_or_else(|| format!("No entry for profile {} on {}", profile_id, date))?;
    let previous_burn = entry.exercise_calories;

    let updated = recalculate_entry_exercise_burn(&conn, entry.id)
        .map_err(|e| format!("Failed to recalculate: {}", e))?
        .ok_or_else(|| "Entry disappeared while recalculating".to_string())?;

    Ok(RecalculateBurnResponse {
        entry_id: updated.id,
        date: updated.date.clone(),
        previous_burn,
        exercise_burn: updated.exercise_calories,
        adjustment: updated.adjustment.unwrap_or(0),
    })
}

/// Verify that `compute_entry_burn` and the logged totals agree; used by the
/// recalculation binary for reporting
pub fn current_burn(db: &Database, profile_id: i64, date: &str) -> Result<i64, String> {
    let profile = load_profile(db, profile_id)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entry = DailyEntry::get(&conn, profile_id, date)
        .map_err(|e| format!("Failed to get entry: {}", e))?
        .ok_or_else(|| format!("No entry for profile {} on {}", profile_id, date))?;
    compute_entry_burn(&conn, entry.id, profile.weight_kg)
        .map_err(|e| format!("Failed to compute burn: {}", e))
}
