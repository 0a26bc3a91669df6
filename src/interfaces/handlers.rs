use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

pub mod auth;
pub mod comments;
pub mod images;
pub mod media;
pub mod system;
pub mod users;

/// Wraps `data` in the `{"success": true, "data": ...}` envelope.
pub fn json_success<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "success": true,
        "data": data
    }))
}

pub fn json_error(status: StatusCode, error: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "success": false,
        "error": error
    }))
}
