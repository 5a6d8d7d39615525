use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::CoachError;
use crate::models::{ActivePlanResponse, GeneratePlanRequest, GeneratePlanResponse};
use crate::services::PlanGenerationService;

#[derive(Clone)]
pub struct PlanAppState {
    pub plan_generation_service: PlanGenerationService,
}

#[derive(Debug, Deserialize)]
pub struct ActivePlanQuery {
    pub user_id: Uuid,
}

pub fn plan_routes(db: PgPool) -> Router {
    let shared_state = PlanAppState {
        plan_generation_service: PlanGenerationService::new(db),
    };

    Router::new()
        .route("/", post(generate_plan))
        .route("/active", get(get_active_plan))
        .with_state(shared_state)
}

/// Generate a plan and make it the user's active one.
pub async fn generate_plan(
    State(state): State<PlanAppState>,
    Json(request): Json<GeneratePlanRequest>,
) -> Result<Json<GeneratePlanResponse>, CoachError> {
    let response = state.plan_generation_service.generate_plan(request).await?;
    Ok(Json(response))
}

/// The active plan with its full week tree.
pub async fn get_active_plan(
    State(state): State<PlanAppState>,
    Query(query): Query<ActivePlanQuery>,
) -> Result<Json<ActivePlanResponse>, CoachError> {
    let response = state
        .plan_generation_service
        .get_active_plan(query.user_id)
        .await?;
    Ok(Json(response))
}
