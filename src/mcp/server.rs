//! MacroTrack MCP Server Implementation
//!
//! Implements the MCP server with all MacroTrack tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::energy::SetTempo;
use crate::models::{DailyEntryUpdate, ProfileCreate, ProfileUpdate, UserExerciseCreate, WorkoutSetCreate};
use crate::tools::profiles::{self, parse_activity_level, parse_goal};
use crate::tools::status::{StatusTracker, TRACKING_INSTRUCTIONS};
use crate::tools::tracking;
use crate::tools::workouts;

/// MacroTrack MCP Service
#[derive(Clone)]
pub struct MacroTrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<MacroTrackService>,
}

impl MacroTrackService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn default_search_limit() -> i64 { 20 }
fn default_list_limit() -> i64 { 50 }
fn default_sets() -> i64 { 3 }
fn default_reps() -> i64 { 10 }
fn default_set_reps() -> i64 { 8 }
fn default_tempo() -> String { "normal".to_string() }
fn default_rest_seconds() -> i64 { 60 }

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateProfileParams {
    /// Display name for the profile
    pub name: String,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Age in years
    pub age: i64,
    /// Biological sex flag, selects the BMR formula branch
    pub is_male: bool,
    /// Activity level index: 0 sedentary .. 4 super active
    pub activity_level: i64,
    /// Goal index: 0 maintain, 1 gain, 2 lose
    pub goal: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetProfileParams {
    /// Profile ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    /// Profile ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New weight in kilograms (optional)
    pub weight_kg: Option<f64>,
    /// New height in centimeters (optional)
    pub height_cm: Option<f64>,
    /// New age in years (optional)
    pub age: Option<i64>,
    /// New sex flag (optional)
    pub is_male: Option<bool>,
    /// New activity level index 0-4 (optional)
    pub activity_level: Option<i64>,
    /// New goal index 0-2 (optional)
    pub goal: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteProfileParams {
    /// Profile ID to delete (daily entries are kept)
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetCalorieTargetsParams {
    /// Profile ID
    pub profile_id: i64,
}

// ============================================================================
// Daily Tracking Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogDayParams {
    /// Profile ID
    pub profile_id: i64,
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Calories consumed (optional, leaves current value when omitted)
    pub calories_consumed: Option<i64>,
    /// Steps taken (optional)
    pub steps_taken: Option<i64>,
    /// Manually entered gym/cardio burn in kcal (optional)
    pub gym_calories: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportStepsParams {
    /// Profile ID
    pub profile_id: i64,
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// Step count from the external source; replaces the stored value
    pub steps: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDaySummaryParams {
    /// Profile ID
    pub profile_id: i64,
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDaysParams {
    /// Profile ID
    pub profile_id: i64,
    /// Start date (inclusive) - optional
    pub start_date: Option<String>,
    /// End date (inclusive) - optional
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetMonthSummaryParams {
    /// Profile ID
    pub profile_id: i64,
    /// Calendar year, e.g. 2026
    pub year: i32,
    /// Month 1-12
    pub month: u32,
}

// ============================================================================
// Workout Parameter Structs
// ============================================================================

/// One set of a logged exercise
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WorkoutSetParam {
    /// Weight lifted in kilograms (default 0)
    #[serde(default)]
    pub weight_kg: f64,
    /// Repetitions (default 8)
    #[serde(default = "default_set_reps")]
    pub reps: i64,
    /// Tempo: slow, normal, fast, or stop_and_go (default normal)
    #[serde(default = "default_tempo")]
    pub tempo: String,
    /// Rest after the set in seconds (default 60)
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: i64,
}

/// One exercise of a logged workout
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WorkoutExerciseParam {
    /// Catalog exercise ID
    pub exercise_id: i64,
    /// Set count for the simple estimate when no detailed sets are given (default 3)
    #[serde(default = "default_sets")]
    pub sets: i64,
    /// Default reps (default 10)
    #[serde(default = "default_reps")]
    pub reps: i64,
    /// Default weight in kilograms (default 0)
    #[serde(default)]
    pub weight_kg: f64,
    /// Freeform notes (optional)
    pub notes: Option<String>,
    /// Detailed per-set data; when present the per-set energy model is used
    pub workout_sets: Option<Vec<WorkoutSetParam>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWorkoutParams {
    /// Profile ID
    pub profile_id: i64,
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
    /// The day's full exercise list; replaces anything logged earlier
    pub exercises: Vec<WorkoutExerciseParam>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetWorkoutParams {
    /// Profile ID
    pub profile_id: i64,
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateWorkoutEnergyParams {
    /// Profile ID (supplies the body weight)
    pub profile_id: i64,
    /// Exercises to evaluate; nothing is saved
    pub exercises: Vec<WorkoutExerciseParam>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecalculateBurnParams {
    /// Profile ID
    pub profile_id: i64,
    /// Date in ISO format: YYYY-MM-DD
    pub date: String,
}

// ============================================================================
// Catalog Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchExercisesParams {
    /// Name fragment to search for
    pub query: String,
    /// Maximum results (default 20)
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetExerciseParams {
    /// Catalog exercise ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListExercisesParams {
    /// Maximum results (default 50)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

/// Convert incoming workout parameters, rejecting unknown tempo strings
fn convert_exercises(params: Vec<WorkoutExerciseParam>) -> Result<Vec<UserExerciseCreate>, McpError> {
    let mut exercises = Vec::with_capacity(params.len());
    for p in params {
        let workout_sets = match p.workout_sets {
            Some(sets) => {
                let mut converted = Vec::with_capacity(sets.len());
                for s in sets {
                    let tempo = SetTempo::from_str(&s.tempo).ok_or_else(|| {
                        McpError::invalid_params(
                            format!("Unknown tempo '{}' (expected slow, normal, fast, stop_and_go)", s.tempo),
                            None,
                        )
                    })?;
                    converted.push(WorkoutSetCreate {
                        weight_kg: s.weight_kg,
                        reps: s.reps,
                        tempo,
                        rest_seconds: s.rest_seconds,
                    });
                }
                Some(converted)
            }
            None => None,
        };
        exercises.push(UserExerciseCreate {
            exercise_id: p.exercise_id,
            sets: p.sets,
            reps: p.reps,
            weight_kg: p.weight_kg,
            notes: p.notes,
            workout_sets,
        });
    }
    Ok(exercises)
}

fn to_json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl MacroTrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the MacroTrack service including build info, database stats, and process information")]
    async fn macrotrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker
            .get_status(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for tracking calories, steps, and workouts. Call this when starting a new tracking session or when unsure how to use the tools.")]
    fn tracking_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(TRACKING_INSTRUCTIONS)]))
    }

    // --- Profiles ---

    #[tool(description = "Create a new profile with body metrics, activity level (0-4), and goal (0 maintain, 1 gain, 2 lose)")]
    fn create_profile(&self, Parameters(p): Parameters<CreateProfileParams>) -> Result<CallToolResult, McpError> {
        let activity_level = parse_activity_level(p.activity_level)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let goal = parse_goal(p.goal).map_err(|e| McpError::invalid_params(e, None))?;
        let data = ProfileCreate {
            name: p.name, weight_kg: p.weight_kg, height_cm: p.height_cm,
            age: p.age, is_male: p.is_male, activity_level, goal,
        };
        let result = profiles::create_profile(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get a profile by ID")]
    fn get_profile(&self, Parameters(p): Parameters<GetProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::get_profile(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => to_json_result(&profile),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Profile not found", "id": {}}}"#, p.id
            ))])),
        }
    }

    #[tool(description = "List all profiles")]
    fn list_profiles(&self) -> Result<CallToolResult, McpError> {
        let result = profiles::list_profiles(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Update a profile in place; only the provided fields change")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let activity_level = match p.activity_level {
            Some(index) => Some(parse_activity_level(index).map_err(|e| McpError::invalid_params(e, None))?),
            None => None,
        };
        let goal = match p.goal {
            Some(index) => Some(parse_goal(index).map_err(|e| McpError::invalid_params(e, None))?),
            None => None,
        };
        let data = ProfileUpdate {
            name: p.name, weight_kg: p.weight_kg, height_cm: p.height_cm,
            age: p.age, is_male: p.is_male, activity_level, goal,
        };
        let result = profiles::update_profile(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => to_json_result(&profile),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Profile not found", "id": {}}}"#, p.id
            ))])),
        }
    }

    #[tool(description = "Delete a profile. Daily entries for the profile are NOT removed.")]
    fn delete_profile(&self, Parameters(p): Parameters<DeleteProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::delete_profile(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get the computed calorie targets for a profile: BMR, TDEE, and the goal-adjusted daily calorie goal")]
    fn get_calorie_targets(&self, Parameters(p): Parameters<GetCalorieTargetsParams>) -> Result<CallToolResult, McpError> {
        let result = profiles::get_calorie_targets(&self.database, p.profile_id).map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Daily Tracking ---

    #[tool(description = "Log consumed calories, steps, and/or manual gym burn for a day. One entry exists per profile per day; repeated calls update it in place.")]
    fn log_day(&self, Parameters(p): Parameters<LogDayParams>) -> Result<CallToolResult, McpError> {
        let data = DailyEntryUpdate {
            calories_consumed: p.calories_consumed,
            steps_taken: p.steps_taken,
            gym_calories: p.gym_calories,
        };
        let result = tracking::log_day(&self.database, p.profile_id, &p.date, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Import a day's step count from an external health-data source, replacing the stored value")]
    fn import_steps(&self, Parameters(p): Parameters<ImportStepsParams>) -> Result<CallToolResult, McpError> {
        let result = tracking::import_steps(&self.database, p.profile_id, &p.date, p.steps)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get the summary for a day: calorie goal, burn breakdown, and signed calories remaining")]
    fn get_day_summary(&self, Parameters(p): Parameters<GetDaySummaryParams>) -> Result<CallToolResult, McpError> {
        let result = tracking::get_day_summary(&self.database, p.profile_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "List a profile's tracked days, newest first, with an optional date range")]
    fn list_days(&self, Parameters(p): Parameters<ListDaysParams>) -> Result<CallToolResult, McpError> {
        let result = tracking::list_days(
            &self.database, p.profile_id, p.start_date.as_deref(), p.end_date.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Roll up one calendar month: per-day figures, totals, and average steps")]
    fn get_month_summary(&self, Parameters(p): Parameters<GetMonthSummaryParams>) -> Result<CallToolResult, McpError> {
        let result = tracking::get_month_summary(&self.database, p.profile_id, p.year, p.month)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Workouts ---

    #[tool(description = "Log the day's workout, replacing any earlier exercise list. Computes the exercise burn from catalog MET values and the profile's body weight, and updates the calorie-availability adjustment by the change.")]
    fn log_workout(&self, Parameters(p): Parameters<LogWorkoutParams>) -> Result<CallToolResult, McpError> {
        let exercises = convert_exercises(p.exercises)?;
        let result = workouts::log_workout(&self.database, p.profile_id, &p.date, exercises)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get the logged workout for a day with per-exercise sets and burn")]
    fn get_workout(&self, Parameters(p): Parameters<GetWorkoutParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::get_workout(&self.database, p.profile_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Preview what a workout would burn for a profile without saving anything")]
    fn estimate_workout_energy(&self, Parameters(p): Parameters<EstimateWorkoutEnergyParams>) -> Result<CallToolResult, McpError> {
        let exercises = convert_exercises(p.exercises)?;
        let result = workouts::estimate_workout_energy(&self.database, p.profile_id, exercises)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    #[tool(description = "Recompute a day's exercise burn from its stored sets and fold the change into the adjustment accumulator")]
    fn recalculate_burn(&self, Parameters(p): Parameters<RecalculateBurnParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::recalculate_burn(&self.database, p.profile_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json_result(&result)
    }

    // --- Exercise Catalog ---

    #[tool(description = "Search the exercise catalog by name; results include the MET value used for burn calculations")]
    fn search_exercises(&self, Parameters(p): Parameters<SearchExercisesParams>) -> Result<CallToolResult, McpError> {
        let conn = self.database.get_conn().map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let result = crate::models::Exercise::search(&conn, &p.query, p.limit)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        to_json_result(&result)
    }

    #[tool(description = "Get a catalog exercise by ID")]
    fn get_exercise(&self, Parameters(p): Parameters<GetExerciseParams>) -> Result<CallToolResult, McpError> {
        let conn = self.database.get_conn().map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let result = crate::models::Exercise::get_by_id(&conn, p.id)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        match result {
            Some(exercise) => to_json_result(&exercise),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Exercise not found", "id": {}}}"#, p.id
            ))])),
        }
    }

    #[tool(description = "List the exercise catalog alphabetically with pagination")]
    fn list_exercises(&self, Parameters(p): Parameters<ListExercisesParams>) -> Result<CallToolResult, McpError> {
        let conn = self.database.get_conn().map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let result = crate::models::Exercise::list(&conn, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        to_json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for MacroTrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "macrotrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("MacroTrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "MacroTrack - calorie, step, and workout tracking. \
                 IMPORTANT: Call tracking_instructions before a logging session. \
                 Profiles: create/get/list/update/delete_profile, get_calorie_targets. \
                 Days: log_day, import_steps, get_day_summary, list_days, get_month_summary. \
                 One entry exists per profile per day; writes update it in place. \
                 Workouts: log_workout (replaces the day's list), get_workout, \
                 estimate_workout_energy (no save), recalculate_burn. \
                 Catalog: search/get/list_exercises (MET values drive burn math). \
                 Activity level indices 0-4, goal indices 0-2, dates YYYY-MM-DD."
                    .into(),
            ),
        }
    }
}
