use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A logged set. Additive record keyed by the planned workout exercise;
/// plan rows themselves are never mutated after generation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SetLog {
    pub id: Uuid,
    pub workout_exercise_id: Uuid,
    pub weight: f64,
    pub reps: i32,
    pub rpe: Option<f64>,
    pub e1rm: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSetRequest {
    pub workout_exercise_id: Uuid,
    pub weight: f64,
    pub reps: i32,
    pub rpe: Option<f64>,
}
