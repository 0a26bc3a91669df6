use actix_web::{http::StatusCode, web, HttpResponse, Responder};

use crate::{
    entities::user::UpdateProfile,
    errors::AppError,
    handlers::{json_error, json_success},
    use_cases::extractors::AuthClaims,
    AppState,
};

pub async fn me(
    state: web::Data<AppState>,
    claims: AuthClaims,
) -> impl Responder {
    match state.user_service.get_by_id(claims.user_id()).await {
        Ok(Some(user)) => json_success(StatusCode::OK, user),
        Ok(None) => user_not_found(),
        Err(e) => e.to_http_response(),
    }
}

pub async fn update_me(
    state: web::Data<AppState>,
    claims: AuthClaims,
    body: web::Json<UpdateProfile>,
) -> impl Responder {
    match state.user_service.update_profile(claims.user_id(), body.into_inner()).await {
        Ok(Some(user)) => json_success(StatusCode::OK, user),
        Ok(None) => user_not_found(),
        Err(e) => e.to_http_response(),
    }
}

/// Favorited media, in the order they were added. Ids whose media is gone are skipped.
pub async fn get_favorites(
    state: web::Data<AppState>,
    claims: AuthClaims,
) -> impl Responder {
    let ids = match state.user_service.get_favorites(claims.user_id()).await {
        Ok(ids) => ids,
        Err(e) => return e.to_http_response(),
    };

    match state.media_service.get_favorites(&ids).await {
        Ok(items) => json_success(StatusCode::OK, items),
        Err(e) => e.to_http_response(),
    }
}

pub async fn add_favorite(
    state: web::Data<AppState>,
    claims: AuthClaims,
    media_id: web::Path<String>,
) -> impl Responder {
    let media_id = media_id.into_inner();
    if let Err(response) = ensure_media_exists(&state, &media_id).await {
        return response;
    }

    match state.user_service.add_to_favorites(claims.user_id(), &media_id).await {
        Ok(true) => favorites_response(&state, claims.user_id()).await,
        Ok(false) => user_not_found(),
        Err(e) => e.to_http_response(),
    }
}

pub async fn remove_favorite(
    state: web::Data<AppState>,
    claims: AuthClaims,
    media_id: web::Path<String>,
) -> impl Responder {
    match state.user_service.remove_from_favorites(claims.user_id(), &media_id).await {
        Ok(true) => favorites_response(&state, claims.user_id()).await,
        Ok(false) => user_not_found(),
        Err(e) => e.to_http_response(),
    }
}

pub async fn get_history(
    state: web::Data<AppState>,
    claims: AuthClaims,
) -> impl Responder {
    match state.user_service.get_history(claims.user_id()).await {
        Ok(history) => json_success(StatusCode::OK, history),
        Err(e) => e.to_http_response(),
    }
}

pub async fn add_history(
    state: web::Data<AppState>,
    claims: AuthClaims,
    media_id: web::Path<String>,
) -> impl Responder {
    let media_id = media_id.into_inner();
    if let Err(response) = ensure_media_exists(&state, &media_id).await {
        return response;
    }

    match state.user_service.add_to_history(claims.user_id(), &media_id).await {
        Ok(true) => history_response(&state, claims.user_id()).await,
        Ok(false) => user_not_found(),
        Err(e) => e.to_http_response(),
    }
}

pub async fn clear_history(
    state: web::Data<AppState>,
    claims: AuthClaims,
) -> impl Responder {
    match state.user_service.clear_history(claims.user_id()).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => user_not_found(),
        Err(e) => e.to_http_response(),
    }
}

async fn ensure_media_exists(state: &AppState, media_id: &str) -> Result<(), HttpResponse> {
    match state.media_service.get_by_id(media_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(AppError::NotFound("Media not found".into()).to_http_response()),
        Err(e) => Err(e.to_http_response()),
    }
}

async fn favorites_response(state: &AppState, user_id: &str) -> HttpResponse {
    match state.user_service.get_favorites(user_id).await {
        Ok(ids) => json_success(StatusCode::OK, ids),
        Err(e) => e.to_http_response(),
    }
}

async fn history_response(state: &AppState, user_id: &str) -> HttpResponse {
    match state.user_service.get_history(user_id).await {
        Ok(history) => json_success(StatusCode::OK, history),
        Err(e) => e.to_http_response(),
    }
}

fn user_not_found() -> HttpResponse {
    json_error(StatusCode::NOT_FOUND, "User not found")
}
