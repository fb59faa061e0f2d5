//! Daily tracking MCP tools
//!
//! Day upserts, step import, and the computed day/month summaries.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::energy;
use crate::models::{DailyEntry, DailyEntryUpdate, Profile};
use crate::tools::profiles::targets_for;

/// One day rolled up for display
#[derive(Debug, Serialize)]
pub struct DayRollup {
    pub date: String,
    pub calories_consumed: i64,
    pub steps_taken: i64,
    pub step_calories: i64,
    pub gym_calories: i64,
    pub exercise_calories: i64,
    pub total_burned: i64,
    pub adjustment: i64,
    /// Signed: negative when over budget
    pub calories_remaining: i64,
}

/// Full summary for a single day
#[derive(Debug, Serialize)]
pub struct DaySummaryResponse {
    pub profile_id: i64,
    pub daily_calorie_goal: i64,
    pub day: DayRollup,
    /// False when nothing has been logged for the day yet
    pub logged: bool,
}

/// Response for log_day / import_steps
#[derive(Debug, Serialize)]
pub struct LogDayResponse {
    pub entry_id: i64,
    pub profile_id: i64,
    pub date: String,
    pub calories_consumed: i64,
    pub steps_taken: i64,
    pub gym_calories: i64,
    pub total_burned: i64,
}

/// Response for list_days
#[derive(Debug, Serialize)]
pub struct ListDaysResponse {
    pub profile_id: i64,
    pub days: Vec<DayRollup>,
    pub total: usize,
}

/// Response for get_month_summary
#[derive(Debug, Serialize)]
pub struct MonthSummaryResponse {
    pub profile_id: i64,
    pub year: i32,
    pub month: u32,
    pub day_count: usize,
    pub total_consumed: i64,
    pub total_steps: i64,
    /// Zero when the month has no logged days
    pub average_steps: i64,
    pub total_burned: i64,
    pub days: Vec<DayRollup>,
}

/// Validate an ISO date string
pub(crate) fn check_date(date: &str) -> Result<(), String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| format!("Invalid date '{}' (expected YYYY-MM-DD)", date))
}

fn rollup(entry: &DailyEntry, daily_goal: i64) -> DayRollup {
    let adjustment = entry.adjustment.unwrap_or(0);
    DayRollup {
        date: entry.date.clone(),
        calories_consumed: entry.calories_consumed,
        steps_taken: entry.steps_taken,
        step_calories: entry.step_calories(),
        gym_calories: entry.gym_calories,
        exercise_calories: entry.exercise_calories,
        total_burned: entry.total_burned(),
        adjustment,
        calories_remaining: energy::daily_remaining(
            daily_goal,
            entry.calories_consumed,
            entry.step_calories(),
            entry.gym_calories,
            entry.exercise_calories,
            adjustment,
        ),
    }
}

fn load_profile(db: &Database, profile_id: i64) -> Result<Profile, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Profile::get_by_id(&conn, profile_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| format!("Profile not found: {}", profile_id))
}

/// Upsert user-entered fields for a day. The first write for a
/// (profile, date) pair creates the entry; later writes update it in place.
pub fn log_day(
    db: &Database,
    profile_id: i64,
    date: &str,
    data: DailyEntryUpdate,
) -> Result<LogDayResponse, String> {
    check_date(date)?;
    load_profile(db, profile_id)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entry = DailyEntry::upsert(&conn, profile_id, date, &data)
        .map_err(|e| format!("Failed to log day: {}", e))?;

    Ok(LogDayResponse {
        entry_id: entry.id,
        profile_id: entry.profile_id,
        date: entry.date.clone(),
        calories_consumed: entry.calories_consumed,
        steps_taken: entry.steps_taken,
        gym_calories: entry.gym_calories,
        total_burned: entry.total_burned(),
    })
}

/// Set a day's step count from an external reading (e.g. a platform
/// health-data export). Same upsert semantics as log_day.
pub fn import_steps(
    db: &Database,
    profile_id: i64,
    date: &str,
    steps: i64,
) -> Result<LogDayResponse, String> {
    check_date(date)?;
    load_profile(db, profile_id)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entry = DailyEntry::set_steps(&conn, profile_id, date, steps)
        .map_err(|e| format!("Failed to import steps: {}", e))?;

    Ok(LogDayResponse {
        entry_id: entry.id,
        profile_id: entry.profile_id,
        date: entry.date.clone(),
        calories_consumed: entry.calories_consumed,
        steps_taken: entry.steps_taken,
        gym_calories: entry.gym_calories,
        total_burned: entry.total_burned(),
    })
}

/// Summary for one day: the entry (or an empty stand-in when nothing has
/// been logged) combined with the profile's calorie targets
pub fn get_day_summary(
    db: &Database,
    profile_id: i64,
    date: &str,
) -> Result<DaySummaryResponse, String> {
    check_date(date)?;
    let profile = load_profile(db, profile_id)?;
    let daily_goal = targets_for(&profile).daily_calorie_goal;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let stored = DailyEntry::get(&conn, profile_id, date)
        .map_err(|e| format!("Failed to get entry: {}", e))?;
    let logged = stored.is_some();

    let day = match stored {
        Some(entry) => rollup(&entry, daily_goal),
        None => DayRollup {
            date: date.to_string(),
            calories_consumed: 0,
            steps_taken: 0,
            step_calories: 0,
            gym_calories: 0,
            exercise_calories: 0,
            total_burned: 0,
            adjustment: 0,
            calories_remaining: daily_goal,
        },
    };

    Ok(DaySummaryResponse {
        profile_id,
        daily_calorie_goal: daily_goal,
        day,
        logged,
    })
}

/// List a profile's days, newest first, with an optional date range
pub fn list_days(
    db: &Database,
    profile_id: i64,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<ListDaysResponse, String> {
    if let Some(start) = start_date {
        check_date(start)?;
    }
    if let Some(end) = end_date {
        check_date(end)?;
    }
    let profile = load_profile(db, profile_id)?;
    let daily_goal = targets_for(&profile).daily_calorie_goal;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entries = DailyEntry::list_for_profile(&conn, profile_id, start_date, end_date)
        .map_err(|e| format!("Failed to list days: {}", e))?;

    let days: Vec<DayRollup> = entries.iter().map(|e| rollup(e, daily_goal)).collect();
    let total = days.len();
    Ok(ListDaysResponse {
        profile_id,
        days,
        total,
    })
}

/// Roll up one calendar month for a profile. Average steps is 0 for a month
/// with no logged days rather than a division fault.
pub fn get_month_summary(
    db: &Database,
    profile_id: i64,
    year: i32,
    month: u32,
) -> Result<MonthSummaryResponse, String> {
    if !(1..=12).contains(&month) {
        return Err(format!("Invalid month {} (expected 1-12)", month));
    }
    let profile = load_profile(db, profile_id)?;
    let daily_goal = targets_for(&profile).daily_calorie_goal;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entries = DailyEntry::list_for_month(&conn, profile_id, year, month)
        .map_err(|e| format!("Failed to list month: {}", e))?;

    let days: Vec<DayRollup> = entries.iter().map(|e| rollup(e, daily_goal)).collect();
    let total_consumed: i64 = days.iter().map(|d| d.calories_consumed).sum();
    let total_steps: i64 = days.iter().map(|d| d.steps_taken).sum();
    let total_burned: i64 = days.iter().map(|d| d.total_burned).sum();
    let average_steps = energy::average_steps(total_steps, days.len() as i64);

    Ok(MonthSummaryResponse {
        profile_id,
        year,
        month,
        day_count: days.len(),
        total_consumed,
        total_steps,
        average_steps,
        total_burned,
        days,
    })
}
