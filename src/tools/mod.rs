//! MacroTrack tools module
//!
//! MCP tool implementations for profile, tracking, and workout management.

pub mod profiles;
pub mod status;
pub mod tracking;
pub mod workouts;
