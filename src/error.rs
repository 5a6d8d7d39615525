use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::engine::tables::SlotType;
use crate::models::BaseLift;

#[derive(Error, Debug)]
pub enum CoachError {
    #[error("{0}")]
    Validation(String),
    #[error("missing exercises in catalog: {}", .0.join(", "))]
    MissingExercises(Vec<String>),
    #[error("{0} not found")]
    NotFound(String),
    #[error("no prescription row for week {week}, {lift} {slot}")]
    PrescriptionGap {
        week: u32,
        lift: BaseLift,
        slot: SlotType,
    },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for CoachError {
    fn into_response(self) -> Response {
        let (status, error_label) = match &self {
            CoachError::Validation(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
            CoachError::MissingExercises(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Exercise catalog incomplete")
            }
            CoachError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            CoachError::PrescriptionGap { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Prescription table defect")
            }
            CoachError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
            CoachError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Serialization error")
            }
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }

        let body = Json(json!({
            "error": error_label,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
