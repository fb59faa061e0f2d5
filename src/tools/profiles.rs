//! Profile MCP tools
//!
//! Profile CRUD plus the computed calorie targets (BMR, TDEE, daily goal).

use serde::Serialize;

use crate::db::Database;
use crate::energy::{self, ActivityLevel, Goal};
use crate::models::{Profile, ProfileCreate, ProfileUpdate};

/// Response for list_profiles
#[derive(Debug, Serialize)]
pub struct ListProfilesResponse {
    pub profiles: Vec<Profile>,
    pub total: usize,
}

/// Response for delete_profile
#[derive(Debug, Serialize)]
pub struct DeleteProfileResponse {
    pub id: i64,
    pub deleted: bool,
    /// Daily entries are never removed with the profile
    pub entries_retained: bool,
}

/// Computed calorie targets for a profile
#[derive(Debug, Serialize)]
pub struct CalorieTargetsResponse {
    pub profile_id: i64,
    /// Basal metabolic rate, kcal/day (real-valued)
    pub bmr: f64,
    /// Total daily energy expenditure, kcal/day (real-valued)
    pub tdee: f64,
    /// Goal-adjusted daily calorie target, truncated for display
    pub daily_calorie_goal: i64,
    pub activity_level: String,
    pub goal: String,
}

/// Resolve an activity-level index coming in from a tool call
pub fn parse_activity_level(index: i64) -> Result<ActivityLevel, String> {
    ActivityLevel::from_index(index)
        .ok_or_else(|| format!("Invalid activity level index {} (expected 0-4)", index))
}

/// Resolve a goal index coming in from a tool call
pub fn parse_goal(index: i64) -> Result<Goal, String> {
    Goal::from_index(index).ok_or_else(|| format!("Invalid goal index {} (expected 0-2)", index))
}

/// Create a new profile
pub fn create_profile(db: &Database, data: ProfileCreate) -> Result<Profile, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Profile::create(&conn, &data).map_err(|e| format!("Failed to create profile: {}", e))
}

/// Get a profile by ID
pub fn get_profile(db: &Database, id: i64) -> Result<Option<Profile>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Profile::get_by_id(&conn, id).map_err(|e| format!("Failed to get profile: {}", e))
}

/// List all profiles
pub fn list_profiles(db: &Database) -> Result<ListProfilesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profiles = Profile::list(&conn).map_err(|e| format!("Failed to list profiles: {}", e))?;
    let total = profiles.len();
    Ok(ListProfilesResponse { profiles, total })
}

/// Update a profile in place
pub fn update_profile(
    db: &Database,
    id: i64,
    data: ProfileUpdate,
) -> Result<Option<Profile>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Profile::update(&conn, id, &data).map_err(|e| format!("Failed to update profile: {}", e))
}

/// Delete a profile (daily entries are retained)
pub fn delete_profile(db: &Database, id: i64) -> Result<DeleteProfileResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted =
        Profile::delete(&conn, id).map_err(|e| format!("Failed to delete profile: {}", e))?;
    Ok(DeleteProfileResponse {
        id,
        deleted,
        entries_retained: true,
    })
}

/// Compute the calorie targets for a profile
pub fn get_calorie_targets(db: &Database, profile_id: i64) -> Result<CalorieTargetsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::get_by_id(&conn, profile_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .ok_or_else(|| format!("Profile not found: {}", profile_id))?;

    Ok(targets_for(&profile))
}

/// Calorie targets computed from an already-loaded profile
pub fn targets_for(profile: &Profile) -> CalorieTargetsResponse {
    let bmr = energy::bmr(
        profile.weight_kg,
        profile.height_cm,
        profile.age,
        profile.is_male,
    );
    let tdee = energy::tdee(bmr, profile.activity_level);
    let daily_goal = energy::daily_calorie_goal(tdee, profile.goal);

    CalorieTargetsResponse {
        profile_id: profile.id,
        bmr,
        tdee,
        daily_calorie_goal: daily_goal as i64,
        activity_level: profile.activity_level.display_name().to_string(),
        goal: profile.goal.display_name().to_string(),
    }
}
