use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;
use crate::errors::BlackCardError;

impl BlackCardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BlackCardError::Config(_) => StatusCode::BAD_REQUEST,
            BlackCardError::Validation(_) => StatusCode::BAD_REQUEST,
            BlackCardError::Authentication(_) => StatusCode::UNAUTHORIZED,
            BlackCardError::Permission(_) => StatusCode::FORBIDDEN,
            BlackCardError::NotFound(_) => StatusCode::NOT_FOUND,
            BlackCardError::Conflict(_) => StatusCode::CONFLICT,
            BlackCardError::LLMUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            BlackCardError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
            BlackCardError::LLMApi(_) | BlackCardError::Network(_) | BlackCardError::Places(_) => StatusCode::BAD_GATEWAY,
            BlackCardError::Json(_) | BlackCardError::Yaml(_) => StatusCode::BAD_REQUEST,
            BlackCardError::Io(_) | BlackCardError::Database(_) | BlackCardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BlackCardError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}
