use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::CoachError;
use crate::services::analytics_service::ProgressTimeline;
use crate::services::AnalyticsService;

#[derive(Clone)]
pub struct AnalyticsAppState {
    pub analytics_service: AnalyticsService,
}

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    pub user_id: Uuid,
}

pub fn analytics_routes(db: PgPool) -> Router {
    let shared_state = AnalyticsAppState {
        analytics_service: AnalyticsService::new(db),
    };

    Router::new()
        .route("/timeline", get(get_timeline))
        .with_state(shared_state)
}

/// Planned vs performed e1RM per lift across the active plan.
pub async fn get_timeline(
    State(state): State<AnalyticsAppState>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<ProgressTimeline>, CoachError> {
    let timeline = state
        .analytics_service
        .progress_timeline(query.user_id)
        .await?;
    Ok(Json(timeline))
}
