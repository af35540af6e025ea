use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("no drivers available")]
    NoAvailableDrivers,

    #[error("order {order_id} failed during preparation at {restaurant}")]
    PreparationFailed { order_id: u32, restaurant: String },

    #[error("delivery failed for order {order_id}")]
    DeliveryFailed { order_id: u32 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::NoAvailableDrivers => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            AppError::PreparationFailed { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::DeliveryFailed { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
