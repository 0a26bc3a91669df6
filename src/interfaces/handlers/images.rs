use actix_web::{
    http::{header, StatusCode},
    web, HttpResponse, Responder,
};

use crate::{handlers::json_error, AppState};

/// Serves an avatar, thumbnail or captured image as raw bytes.
pub async fn get_image(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> impl Responder {
    match state.images.get(&id) {
        Some(image) => HttpResponse::Ok()
            .content_type(image.mime_type)
            .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
            .body(image.bytes),
        None => json_error(StatusCode::NOT_FOUND, "Image not found"),
    }
}
