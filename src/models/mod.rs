//! Data models
//!
//! Rust structs representing database entities.

mod daily_entry;
mod exercise;
mod profile;
mod workout;

pub use daily_entry::{DailyEntry, DailyEntryUpdate};
pub use exercise::{Exercise, ExerciseSeed, DEFAULT_CATALOG_JSON};
pub use profile::{Profile, ProfileCreate, ProfileUpdate};
pub use workout::{
    compute_entry_burn, recalculate_entry_exercise_burn, UserExercise, UserExerciseCreate,
    WorkoutSet, WorkoutSetCreate,
};
