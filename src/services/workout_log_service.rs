//! Set logging. Each logged set is validated, optionally scored with an
//! estimated 1RM, and appended; logs are never updated in place.

use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::engine::load_model::estimate_one_rep_max;
use crate::error::CoachError;
use crate::models::{Exercise, ExerciseRow, LogSetRequest, SetLog, TrackingMode};

/// Reject unusable measurements before they reach storage.
pub(crate) fn validate_set_input(
    weight: f64,
    reps: i32,
    rpe: Option<f64>,
) -> Result<(), CoachError> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(CoachError::Validation(
            "weight must be a positive number".to_string(),
        ));
    }
    if reps <= 0 {
        return Err(CoachError::Validation(
            "reps must be at least 1".to_string(),
        ));
    }
    if let Some(rpe) = rpe {
        if !rpe.is_finite() || !(1.0..=10.0).contains(&rpe) {
            return Err(CoachError::Validation(
                "rpe must be between 1 and 10".to_string(),
            ));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct WorkoutLogService {
    db: PgPool,
}

impl WorkoutLogService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record one performed set against a prescribed workout exercise.
    /// An e1RM is stored only for main lifts tracked by e1RM and only when
    /// an RPE was reported; variation work stays volume-only.
    pub async fn log_set(&self, request: LogSetRequest) -> Result<SetLog, CoachError> {
        validate_set_input(request.weight, request.reps, request.rpe)?;

        let row: Option<ExerciseRow> = sqlx::query_as(
            "SELECT e.id, e.name, e.base_lift, e.is_main_lift, e.tracking_mode
             FROM workout_exercises we
             JOIN exercises e ON e.id = we.exercise_id
             WHERE we.id = $1",
        )
        .bind(request.workout_exercise_id)
        .fetch_optional(&self.db)
        .await?;
        let exercise = Exercise::try_from(
            row.ok_or_else(|| CoachError::NotFound("workout exercise".to_string()))?,
        )?;

        let e1rm = match (exercise.is_main_lift, exercise.tracking_mode, request.rpe) {
            (true, TrackingMode::E1rm, Some(rpe)) => estimate_one_rep_max(
                request.weight,
                request.reps as f64,
                rpe,
                exercise.base_lift,
            ),
            _ => None,
        };

        let log: SetLog = sqlx::query_as(
            "INSERT INTO set_logs (workout_exercise_id, weight, reps, rpe, e1rm)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, workout_exercise_id, weight, reps, rpe, e1rm, created_at",
        )
        .bind(request.workout_exercise_id)
        .bind(request.weight)
        .bind(request.reps)
        .bind(request.rpe)
        .bind(e1rm)
        .fetch_one(&self.db)
        .await?;

        debug!(
            workout_exercise_id = %request.workout_exercise_id,
            exercise = %exercise.name,
            e1rm = ?log.e1rm,
            "logged set"
        );

        Ok(log)
    }

    /// All sets logged against one prescribed exercise, oldest first.
    pub async fn sets_for_exercise(
        &self,
        workout_exercise_id: Uuid,
    ) -> Result<Vec<SetLog>, CoachError> {
        let logs = sqlx::query_as(
            "SELECT id, workout_exercise_id, weight, reps, rpe, e1rm, created_at
             FROM set_logs
             WHERE workout_exercise_id = $1
             ORDER BY created_at",
        )
        .bind(workout_exercise_id)
        .fetch_all(&self.db)
        .await?;
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn accepts_a_normal_set() {
        assert!(validate_set_input(142.5, 5, Some(8.0)).is_ok());
        assert!(validate_set_input(60.0, 12, None).is_ok());
    }

    #[test]
    fn rejects_non_positive_weight() {
        assert_matches!(
            validate_set_input(0.0, 5, None),
            Err(CoachError::Validation(_))
        );
        assert_matches!(
            validate_set_input(-20.0, 5, None),
            Err(CoachError::Validation(_))
        );
        assert_matches!(
            validate_set_input(f64::NAN, 5, None),
            Err(CoachError::Validation(_))
        );
    }

    #[test]
    fn rejects_zero_reps() {
        assert_matches!(
            validate_set_input(100.0, 0, None),
            Err(CoachError::Validation(_))
        );
    }

    #[test]
    fn rejects_out_of_range_rpe() {
        assert_matches!(
            validate_set_input(100.0, 5, Some(0.5)),
            Err(CoachError::Validation(_))
        );
        assert_matches!(
            validate_set_input(100.0, 5, Some(10.5)),
            Err(CoachError::Validation(_))
        );
    }
}
