//! MacroTrack Library
//!
//! Core functionality for calorie, step, and workout tracking.

pub mod build_info;
pub mod db;
pub mod energy;
pub mod mcp;
pub mod models;
pub mod tools;
