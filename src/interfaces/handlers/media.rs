use actix_web::{http::StatusCode, web, HttpResponse, Responder};

use crate::{
    constants::DEFAULT_RECENT_LIMIT,
    entities::media::{MediaItem, MediaQuery, MediaType, RecentQuery, UpdateMedia, UploadMediaRequest},
    errors::AppError,
    handlers::{json_error, json_success},
    use_cases::extractors::AuthClaims,
    AppState,
};

/// Lists media, optionally narrowed by `type`, `category` and `user_id`.
/// Filters combine; results keep the collection order (newest first).
pub async fn list_media(
    state: web::Data<AppState>,
    query: web::Query<MediaQuery>,
) -> impl Responder {
    match filtered_media(&state, query.into_inner()).await {
        Ok(items) => json_success(StatusCode::OK, items),
        Err(e) => e.to_http_response(),
    }
}

async fn filtered_media(state: &AppState, query: MediaQuery) -> Result<Vec<MediaItem>, AppError> {
    let media_type = query
        .media_type
        .as_deref()
        .map(str::parse::<MediaType>)
        .transpose()?;

    let mut items = match (&query.user_id, media_type) {
        (Some(user_id), _) => state.media_service.get_by_user(user_id).await?,
        (None, Some(media_type)) => state.media_service.get_by_type(media_type).await?,
        (None, None) => state.media_service.get_all().await?,
    };

    if let Some(media_type) = media_type {
        items.retain(|item| item.media_type == media_type);
    }
    if let Some(category) = &query.category {
        items.retain(|item| &item.category == category);
    }

    Ok(items)
}

pub async fn recent_media(
    state: web::Data<AppState>,
    query: web::Query<RecentQuery>,
) -> impl Responder {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);

    match state.media_service.get_recent(limit).await {
        Ok(items) => json_success(StatusCode::OK, items),
        Err(e) => e.to_http_response(),
    }
}

pub async fn get_media(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> impl Responder {
    match state.media_service.get_by_id(&id).await {
        Ok(Some(item)) => json_success(StatusCode::OK, item),
        Ok(None) => media_not_found(),
        Err(e) => e.to_http_response(),
    }
}

pub async fn upload_media(
    state: web::Data<AppState>,
    claims: AuthClaims,
    body: web::Json<UploadMediaRequest>,
) -> impl Responder {
    match state.upload_service.upload_media(body.into_inner(), claims.user_id()).await {
        Ok(item) => json_success(StatusCode::CREATED, item),
        Err(e) => e.to_http_response(),
    }
}

pub async fn update_media(
    state: web::Data<AppState>,
    claims: AuthClaims,
    id: web::Path<String>,
    body: web::Json<UpdateMedia>,
) -> impl Responder {
    match state.media_service.update(&id, &body, claims.user_id()).await {
        Ok(Some(item)) => json_success(StatusCode::OK, item),
        Ok(None) => media_not_found(),
        Err(e) => e.to_http_response(),
    }
}

/// Deletes an owned item, its stored images and its comments.
pub async fn delete_media(
    state: web::Data<AppState>,
    claims: AuthClaims,
    id: web::Path<String>,
) -> impl Responder {
    match state.upload_service.remove_media(&id, claims.user_id()).await {
        Ok(true) => {}
        Ok(false) => return media_not_found(),
        Err(e) => return e.to_http_response(),
    }

    // The item is already gone; orphaned comments are only logged.
    match state.comment_service.delete_for_media(&id).await {
        Ok(removed) => {
            tracing::debug!(media_id = %id, removed, "Dropped comments of deleted media");
        }
        Err(e) => {
            tracing::error!(media_id = %id, "Failed to drop comments of deleted media: {}", e);
        }
    }

    HttpResponse::NoContent().finish()
}

fn media_not_found() -> HttpResponse {
    json_error(StatusCode::NOT_FOUND, "Media not found")
}
