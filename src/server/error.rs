use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

// Everything an endpoint can answer with besides data. The client kinds
// map to 400, storage trouble to 500; messages go out in Spanish as the
// greenhouse frontend expects them.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    MalformedRequest(&'static str),
    MissingField(&'static str),
    InvalidType,
    OutOfRange(&'static str),
    Storage(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::MalformedRequest(msg) => (*msg).to_string(),
            ApiError::MissingField(field) => format!("Falta el campo '{field}'"),
            ApiError::InvalidType => "Temperatura y humedad deben ser números válidos".to_string(),
            ApiError::OutOfRange(msg) => (*msg).to_string(),
            ApiError::Storage(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.message() }))).into_response()
    }
}
