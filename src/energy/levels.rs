//! Activity, goal, and tempo enumerations
//!
//! Closed enumerations with their associated multiplier/offset tables.
//! Indices match the order users pick them in (0-4 for activity, 0-2 for
//! goal) and are what gets stored on a profile row.

use serde::{Deserialize, Serialize};

/// Self-reported activity level, scales BMR into TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    SuperActive,
}

impl ActivityLevel {
    /// All levels in index order
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::SuperActive,
    ];

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::SuperActive => 1.9,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary (office job, <5k steps/day, no exercise)",
            ActivityLevel::LightlyActive => {
                "Light Activity (5-8k steps/day, 1-2 light workouts/week)"
            }
            ActivityLevel::ModeratelyActive => {
                "Moderate Activity (8-10k steps/day, 3-4 medium workouts/week)"
            }
            ActivityLevel::VeryActive => {
                "Very Active (active job or 10k+ steps/day with 4-5 intense workouts/week)"
            }
            ActivityLevel::SuperActive => {
                "Super Active (physical job plus regular intense exercise)"
            }
        }
    }

    /// Look up a level by its stored index (0-4)
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(ActivityLevel::Sedentary),
            1 => Some(ActivityLevel::LightlyActive),
            2 => Some(ActivityLevel::ModeratelyActive),
            3 => Some(ActivityLevel::VeryActive),
            4 => Some(ActivityLevel::SuperActive),
            _ => None,
        }
    }

    /// Index stored in the database
    pub fn as_index(&self) -> i64 {
        match self {
            ActivityLevel::Sedentary => 0,
            ActivityLevel::LightlyActive => 1,
            ActivityLevel::ModeratelyActive => 2,
            ActivityLevel::VeryActive => 3,
            ActivityLevel::SuperActive => 4,
        }
    }
}

/// Weight goal, shifts the daily calorie target by a fixed offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Maintain,
    Gain,
    Lose,
}

impl Goal {
    /// All goals in index order
    pub const ALL: [Goal; 3] = [Goal::Maintain, Goal::Gain, Goal::Lose];

    /// Daily kcal offset applied to TDEE
    pub fn offset_kcal(&self) -> f64 {
        match self {
            Goal::Maintain => 0.0,
            Goal::Gain => 300.0,
            Goal::Lose => -300.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Goal::Maintain => "Maintain Weight",
            Goal::Gain => "Gain Weight",
            Goal::Lose => "Lose Weight",
        }
    }

    /// Look up a goal by its stored index (0-2)
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Goal::Maintain),
            1 => Some(Goal::Gain),
            2 => Some(Goal::Lose),
            _ => None,
        }
    }

    /// Index stored in the database
    pub fn as_index(&self) -> i64 {
        match self {
            Goal::Maintain => 0,
            Goal::Gain => 1,
            Goal::Lose => 2,
        }
    }
}

/// Lifting tempo for a single set, stretches or shrinks the active phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetTempo {
    Slow,
    Normal,
    Fast,
    StopAndGo,
}

impl Default for SetTempo {
    fn default() -> Self {
        SetTempo::Normal
    }
}

impl SetTempo {
    /// Multiplier on the base active-phase duration
    pub fn duration_factor(&self) -> f64 {
        match self {
            SetTempo::Slow => 1.5,
            SetTempo::Normal => 1.0,
            SetTempo::Fast => 0.8,
            SetTempo::StopAndGo => 1.3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SetTempo::Slow => "Slow",
            SetTempo::Normal => "Normal",
            SetTempo::Fast => "Fast",
            SetTempo::StopAndGo => "Stop and Go",
        }
    }

    /// Convert to database string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SetTempo::Slow => "slow",
            SetTempo::Normal => "normal",
            SetTempo::Fast => "fast",
            SetTempo::StopAndGo => "stop_and_go",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(SetTempo::Slow),
            "normal" => Some(SetTempo::Normal),
            "fast" => Some(SetTempo::Fast),
            "stop_and_go" | "stop-and-go" | "stopandgo" => Some(SetTempo::StopAndGo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_multipliers() {
        assert_eq!(ActivityLevel::Sedentary.multiplier(), 1.2);
        assert_eq!(ActivityLevel::LightlyActive.multiplier(), 1.375);
        assert_eq!(ActivityLevel::ModeratelyActive.multiplier(), 1.55);
        assert_eq!(ActivityLevel::VeryActive.multiplier(), 1.725);
        assert_eq!(ActivityLevel::SuperActive.multiplier(), 1.9);
    }

    #[test]
    fn test_activity_index_round_trip() {
        for level in ActivityLevel::ALL {
            assert_eq!(ActivityLevel::from_index(level.as_index()), Some(level));
        }
        assert_eq!(ActivityLevel::from_index(5), None);
        assert_eq!(ActivityLevel::from_index(-1), None);
    }

    #[test]
    fn test_goal_offsets() {
        assert_eq!(Goal::Maintain.offset_kcal(), 0.0);
        assert_eq!(Goal::Gain.offset_kcal(), 300.0);
        assert_eq!(Goal::Lose.offset_kcal(), -300.0);
    }

    #[test]
    fn test_goal_index_round_trip() {
        for goal in Goal::ALL {
            assert_eq!(Goal::from_index(goal.as_index()), Some(goal));
        }
        assert_eq!(Goal::from_index(3), None);
    }

    #[test]
    fn test_tempo_factors() {
        assert_eq!(SetTempo::Slow.duration_factor(), 1.5);
        assert_eq!(SetTempo::Normal.duration_factor(), 1.0);
        assert_eq!(SetTempo::Fast.duration_factor(), 0.8);
        assert_eq!(SetTempo::StopAndGo.duration_factor(), 1.3);
    }

    #[test]
    fn test_tempo_strings() {
        assert_eq!(SetTempo::from_str("slow"), Some(SetTempo::Slow));
        assert_eq!(SetTempo::from_str("Stop-and-Go"), Some(SetTempo::StopAndGo));
        assert_eq!(SetTempo::from_str("sprint"), None);
        for tempo in [SetTempo::Slow, SetTempo::Normal, SetTempo::Fast, SetTempo::StopAndGo] {
            assert_eq!(SetTempo::from_str(tempo.to_db_str()), Some(tempo));
        }
    }
}
