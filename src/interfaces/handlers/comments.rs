use actix_web::{http::StatusCode, web, HttpResponse, Responder};

use crate::{
    entities::comment::{CommentRequest, NewComment},
    handlers::{json_error, json_success},
    use_cases::extractors::AuthClaims,
    AppState,
};

pub async fn list_comments(
    state: web::Data<AppState>,
    media_id: web::Path<String>,
) -> impl Responder {
    match state.comment_service.get_by_media_id(&media_id).await {
        Ok(comments) => json_success(StatusCode::OK, comments),
        Err(e) => e.to_http_response(),
    }
}

/// Posts a comment as the caller. Name and avatar are copied from the profile.
pub async fn add_comment(
    state: web::Data<AppState>,
    claims: AuthClaims,
    media_id: web::Path<String>,
    body: web::Json<CommentRequest>,
) -> impl Responder {
    let media_id = media_id.into_inner();

    match state.media_service.get_by_id(&media_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return json_error(StatusCode::NOT_FOUND, "Media not found"),
        Err(e) => return e.to_http_response(),
    }

    let author = match state.user_service.get_by_id(claims.user_id()).await {
        Ok(Some(user)) => user,
        Ok(None) => return json_error(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => return e.to_http_response(),
    };

    let comment = NewComment {
        media_id,
        user_id: author.id,
        user_name: author.name,
        user_avatar: author.image,
        text: body.into_inner().text,
    };

    match state.comment_service.add(comment).await {
        Ok(comment) => json_success(StatusCode::CREATED, comment),
        Err(e) => e.to_http_response(),
    }
}

pub async fn delete_comment(
    state: web::Data<AppState>,
    claims: AuthClaims,
    id: web::Path<String>,
) -> impl Responder {
    match state.comment_service.delete(&id, claims.user_id()).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => json_error(StatusCode::NOT_FOUND, "Comment not found"),
        Err(e) => e.to_http_response(),
    }
}
