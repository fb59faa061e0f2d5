//! Energy model
//!
//! Pure calorie arithmetic: BMR/TDEE estimation, goal-adjusted daily targets,
//! step-based burn, and MET-based exercise energy expenditure. No I/O, no
//! shared state; every function here is safe to call repeatedly with the
//! same inputs.

pub mod calculator;
pub mod levels;

pub use calculator::{
    average_steps, bmr, daily_calorie_goal, daily_remaining, exercise_energy, set_energy,
    step_calories, tdee, ExerciseLog, SetEffort,
};
pub use levels::{ActivityLevel, Goal, SetTempo};
