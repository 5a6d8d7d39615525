use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::CoachError;
use crate::models::{LogSetRequest, SetLog};
use crate::services::WorkoutLogService;

#[derive(Clone)]
pub struct SetAppState {
    pub workout_log_service: WorkoutLogService,
}

pub fn set_routes(db: PgPool) -> Router {
    let shared_state = SetAppState {
        workout_log_service: WorkoutLogService::new(db),
    };

    Router::new()
        .route("/", post(log_set))
        .route("/exercise/:workout_exercise_id", get(get_sets))
        .with_state(shared_state)
}

/// Record one performed set.
pub async fn log_set(
    State(state): State<SetAppState>,
    Json(request): Json<LogSetRequest>,
) -> Result<Json<SetLog>, CoachError> {
    let log = state.workout_log_service.log_set(request).await?;
    Ok(Json(log))
}

/// All sets logged against a prescribed exercise, oldest first.
pub async fn get_sets(
    State(state): State<SetAppState>,
    Path(workout_exercise_id): Path<Uuid>,
) -> Result<Json<Vec<SetLog>>, CoachError> {
    let logs = state
        .workout_log_service
        .sets_for_exercise(workout_exercise_id)
        .await?;
    Ok(Json(logs))
}
