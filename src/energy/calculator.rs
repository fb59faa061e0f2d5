//! Calorie calculations
//!
//! BMR (Mifflin-St Jeor), TDEE, goal-adjusted daily targets, step burn, and
//! the per-set exercise energy model. Inputs are taken at face value: out of
//! range values flow through the arithmetic unrejected, so a negative weight
//! yields a negative (meaningless but well-defined) result.

use super::levels::{ActivityLevel, Goal, SetTempo};

/// Rough estimate: one step burns ~0.04 kcal
pub const KCAL_PER_STEP: f64 = 0.04;

/// MET approximating light resting metabolism between sets
pub const REST_MET: f64 = 1.3;

/// Base active-phase minutes per rep (3 seconds per rep)
const MINUTES_PER_REP: f64 = 0.05;

/// Assumed bar displacement per rep, meters (typical squat depth)
const DISPLACEMENT_PER_REP_M: f64 = 0.6;

/// Standard gravity, m/s^2
const GRAVITY: f64 = 9.81;

/// Joules per kilocalorie
const JOULES_PER_KCAL: f64 = 4184.0;

/// Assumed mechanical efficiency of muscle work
const MECHANICAL_EFFICIENCY: f64 = 0.25;

/// Basal metabolic rate in kcal/day (Mifflin-St Jeor)
pub fn bmr(weight_kg: f64, height_cm: f64, age: i64, is_male: bool) -> f64 {
    if is_male {
        10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64 + 5.0
    } else {
        10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64 - 161.0
    }
}

/// Total daily energy expenditure: BMR scaled by activity
pub fn tdee(bmr: f64, level: ActivityLevel) -> f64 {
    bmr * level.multiplier()
}

/// Goal-adjusted daily calorie target. Remains real-valued; truncate only
/// at display/aggregation points.
pub fn daily_calorie_goal(tdee: f64, goal: Goal) -> f64 {
    tdee + goal.offset_kcal()
}

/// Calories burned by walking, fixed linear coefficient per step
pub fn step_calories(steps: i64) -> i64 {
    (steps as f64 * KCAL_PER_STEP) as i64
}

/// The effort recorded for one set of a strength exercise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetEffort {
    /// Weight lifted, kg
    pub weight_kg: f64,
    pub reps: i64,
    pub tempo: SetTempo,
    /// Rest after this set, seconds
    pub rest_seconds: i64,
}

impl Default for SetEffort {
    fn default() -> Self {
        Self {
            weight_kg: 0.0,
            reps: 8,
            tempo: SetTempo::Normal,
            rest_seconds: 60,
        }
    }
}

/// What was logged for an exercise: detailed per-set data, or just a set
/// count for the simple one-minute-per-set estimate
#[derive(Debug, Clone, Copy)]
pub enum ExerciseLog<'a> {
    Detailed(&'a [SetEffort]),
    Simple { sets: i64 },
}

/// Energy for a single set in kcal: work phase + mechanical work + inter-set
/// rest, truncated once after summation. Rest is skipped when `include_rest`
/// is false (the last set of an exercise has nothing after it).
pub fn set_energy(set: &SetEffort, met: f64, body_weight_kg: f64, include_rest: bool) -> i64 {
    let active_minutes = set.reps as f64 * MINUTES_PER_REP * set.tempo.duration_factor();
    let work_kcal = met * body_weight_kg * (active_minutes / 60.0);

    let mechanical_joules = set.weight_kg * GRAVITY * DISPLACEMENT_PER_REP_M * set.reps as f64;
    let mechanical_kcal = (mechanical_joules / JOULES_PER_KCAL) / MECHANICAL_EFFICIENCY;

    let rest_kcal = if include_rest {
        REST_MET * body_weight_kg * (set.rest_seconds as f64 / 3600.0)
    } else {
        0.0
    };

    (work_kcal + mechanical_kcal + rest_kcal) as i64
}

/// Total energy for one logged exercise in kcal.
///
/// Detailed logs sum per-set energy, excluding rest for the last set of the
/// exercise's set list. Simple logs treat each set as one minute at the
/// exercise's MET value.
pub fn exercise_energy(log: &ExerciseLog, met: f64, body_weight_kg: f64) -> i64 {
    match log {
        ExerciseLog::Detailed(sets) => {
            let mut total = 0;
            for (index, set) in sets.iter().enumerate() {
                let include_rest = index < sets.len() - 1;
                total += set_energy(set, met, body_weight_kg, include_rest);
            }
            total
        }
        ExerciseLog::Simple { sets } => {
            (met * body_weight_kg * (*sets as f64 / 60.0)) as i64
        }
    }
}

/// Signed "calories remaining" for a day: goal minus consumption, plus every
/// burn source and the delta-accumulated adjustment
pub fn daily_remaining(
    goal: i64,
    consumed: i64,
    steps_burn: i64,
    gym_burn: i64,
    exercise_burn: i64,
    adjustment: i64,
) -> i64 {
    goal - consumed + steps_burn + gym_burn + exercise_burn + adjustment
}

/// Average steps per day, zero when there are no days to average over
pub fn average_steps(total_steps: i64, day_count: i64) -> i64 {
    if day_count == 0 {
        0
    } else {
        total_steps / day_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmr_male() {
        assert_eq!(bmr(70.0, 175.0, 30, true), 1773.75);
    }

    #[test]
    fn test_bmr_female() {
        assert_eq!(bmr(60.0, 165.0, 25, false), 1595.25);
    }

    #[test]
    fn test_bmr_pass_through_negative_weight() {
        // No validation: nonsense in, well-defined nonsense out
        let result = bmr(-70.0, 175.0, 30, true);
        assert_eq!(result, -700.0 + 1093.75 - 150.0 + 5.0);
    }

    #[test]
    fn test_tdee_sedentary() {
        assert_eq!(tdee(1700.0, ActivityLevel::Sedentary), 2040.0);
    }

    #[test]
    fn test_daily_goal_offsets() {
        assert_eq!(daily_calorie_goal(2040.0, Goal::Lose), 1740.0);
        assert_eq!(daily_calorie_goal(2040.0, Goal::Gain), 2340.0);
        assert_eq!(daily_calorie_goal(2040.0, Goal::Maintain), 2040.0);
    }

    #[test]
    fn test_step_calories() {
        assert_eq!(step_calories(10_000), 400);
        assert_eq!(step_calories(0), 0);
        assert_eq!(step_calories(99), 3); // 3.96 truncates
    }

    #[test]
    fn test_set_energy_worked_example() {
        // reps=10, normal tempo, no bar weight, 60s rest, MET 3.0, 70kg body:
        // work = 3.0*70*(0.5/60) = 1.75, mechanical = 0,
        // rest = 1.3*70*(60/3600) ~ 1.5167, total truncates to 3
        let set = SetEffort {
            weight_kg: 0.0,
            reps: 10,
            tempo: SetTempo::Normal,
            rest_seconds: 60,
        };
        assert_eq!(set_energy(&set, 3.0, 70.0, true), 3);
        // Last set of an exercise drops the rest term
        assert_eq!(set_energy(&set, 3.0, 70.0, false), 1);
    }

    #[test]
    fn test_set_energy_mechanical_component() {
        // 100kg x 10 reps: 100*9.81*0.6*10 J = 5886 J
        // -> 5886/4184/0.25 ~ 5.627 kcal on top of the work phase
        let set = SetEffort {
            weight_kg: 100.0,
            reps: 10,
            tempo: SetTempo::Normal,
            rest_seconds: 60,
        };
        let without_weight = SetEffort { weight_kg: 0.0, ..set };
        // with: trunc(1.75 + 5.627) = 7, without: trunc(1.75) = 1
        let with = set_energy(&set, 3.0, 70.0, false);
        let without = set_energy(&without_weight, 3.0, 70.0, false);
        assert_eq!(with - without, 6);
    }

    #[test]
    fn test_set_energy_tempo_scaling() {
        let slow = SetEffort { tempo: SetTempo::Slow, reps: 20, ..Default::default() };
        let fast = SetEffort { tempo: SetTempo::Fast, reps: 20, ..Default::default() };
        assert!(
            set_energy(&slow, 6.0, 80.0, false) > set_energy(&fast, 6.0, 80.0, false)
        );
    }

    #[test]
    fn test_exercise_energy_excludes_rest_for_last_set() {
        let sets = vec![SetEffort::default(), SetEffort::default(), SetEffort::default()];
        let detailed = exercise_energy(&ExerciseLog::Detailed(&sets), 3.0, 70.0);

        // Manually: first two sets with rest, last without
        let with_rest = set_energy(&sets[0], 3.0, 70.0, true);
        let without_rest = set_energy(&sets[2], 3.0, 70.0, false);
        assert_eq!(detailed, 2 * with_rest + without_rest);
    }

    #[test]
    fn test_exercise_energy_simple_estimate() {
        // Each "set" counts as one minute at the exercise's MET
        assert_eq!(
            exercise_energy(&ExerciseLog::Simple { sets: 3 }, 6.0, 80.0),
            (6.0 * 80.0 * (3.0 / 60.0)) as i64
        );
        assert_eq!(exercise_energy(&ExerciseLog::Simple { sets: 0 }, 6.0, 80.0), 0);
    }

    #[test]
    fn test_exercise_energy_empty_detailed_list() {
        assert_eq!(exercise_energy(&ExerciseLog::Detailed(&[]), 3.0, 70.0), 0);
    }

    #[test]
    fn test_daily_remaining() {
        assert_eq!(daily_remaining(1740, 2000, 400, 100, 50, 0), 290);
        // Signed: overeating with no burn goes negative
        assert_eq!(daily_remaining(1740, 2500, 0, 0, 0, 0), -760);
        // Adjustment participates directly
        assert_eq!(daily_remaining(1740, 0, 0, 0, 0, 30), 1770);
    }

    #[test]
    fn test_average_steps_zero_days() {
        assert_eq!(average_steps(12_000, 0), 0);
        assert_eq!(average_steps(12_000, 3), 4000);
    }

    #[test]
    fn test_purity() {
        let set = SetEffort { weight_kg: 42.5, reps: 12, tempo: SetTempo::StopAndGo, rest_seconds: 90 };
        let first = set_energy(&set, 5.0, 82.3, true);
        let second = set_energy(&set, 5.0, 82.3, true);
        assert_eq!(first, second);
        assert_eq!(bmr(70.0, 175.0, 30, true), bmr(70.0, 175.0, 30, true));
    }
}
