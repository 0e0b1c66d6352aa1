use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid coordinates")]
    InvalidPosition,

    #[error("Invalid bus number: {0:?}")]
    InvalidBusNumber(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidPosition | AppError::InvalidBusNumber(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        tracing::warn!(%status, error = %self, "Request rejected");

        let body = Json(json!({ "status": "failure", "message": self.to_string() }));
        (status, body).into_response()
    }
}
