use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{BaseLift, Weakness};

/// One-rep maxes in kilograms, supplied once per generation run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OneRepMaxes {
    pub squat: f64,
    pub bench: f64,
    pub deadlift: f64,
}

impl OneRepMaxes {
    pub fn for_lift(&self, lift: BaseLift) -> f64 {
        match lift {
            BaseLift::Squat => self.squat,
            BaseLift::Bench => self.bench,
            BaseLift::Deadlift => self.deadlift,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proficiency {
    Beginner,
    Advanced,
}

impl Proficiency {
    pub fn as_str(self) -> &'static str {
        match self {
            Proficiency::Beginner => "Beginner",
            Proficiency::Advanced => "Advanced",
        }
    }
}

/// Input contract for one plan generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePlanRequest {
    pub user_id: Uuid,
    pub days_of_week: Vec<String>,
    pub one_rms: OneRepMaxes,
    pub proficiency: Proficiency,
    #[serde(default)]
    pub weaknesses: Vec<Weakness>,
    #[serde(default = "default_true")]
    pub deload_after_week8: bool,
    #[serde(default)]
    pub deload_after_week10: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Plan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub duration_weeks: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanWeek {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub week_number: i32,
    pub sequence_number: i32,
    pub is_deload: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub week_id: Uuid,
    pub day_number: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutExercise {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub target_sets: i32,
    pub target_reps: i32,
    pub target_rpe: Option<f64>,
    pub target_percentage: Option<f64>,
    pub planned_weight: Option<f64>,
}

/// Workout exercise joined with its catalog entry, for plan reads.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkoutExerciseDetail {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_name: String,
    pub base_lift: String,
    pub is_main_lift: bool,
    pub target_sets: i32,
    pub target_reps: i32,
    pub target_rpe: Option<f64>,
    pub target_percentage: Option<f64>,
    pub planned_weight: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct GeneratePlanResponse {
    pub plan_id: Uuid,
    pub name: String,
    pub total_weeks: u32,
    /// Sequence numbers of weeks that needed relaxed slot placement.
    pub relaxed_weeks: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct ActivePlanResponse {
    pub plan: Plan,
    pub weeks: Vec<PlanWeekView>,
}

#[derive(Debug, Serialize)]
pub struct PlanWeekView {
    pub week: PlanWeek,
    pub workouts: Vec<WorkoutView>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutView {
    pub workout: Workout,
    pub exercises: Vec<WorkoutExerciseDetail>,
}
