use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::analytics::analytics_routes;
use super::health::health_check;
use super::plans::plan_routes;
use super::sets::set_routes;

pub fn create_routes(db: PgPool) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/plans", plan_routes(db.clone()))
        .nest("/api/sets", set_routes(db.clone()))
        .nest("/api/analytics", analytics_routes(db))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
