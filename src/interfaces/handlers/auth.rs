use actix_web::{http::StatusCode, post, web, Responder, ResponseError};
use validator::Validate;

use crate::entities::token::AuthResponse;
use crate::entities::user::{LoginUser, NewUser};
use crate::errors::{AppError, AuthError};
use crate::handlers::json_success;
use crate::AppState;

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<NewUser>
) -> impl Responder {
    let user = match state.user_service.register(user.into_inner()).await {
        Ok(user) => user,
        Err(e) => return e.to_http_response(),
    };

    match state.jwt_service.create_jwt(&user) {
        Ok(token) => json_success(StatusCode::CREATED, AuthResponse::new(token, user)),
        Err(e) => AppError::from(e).to_http_response(),
    }
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<LoginUser>
) -> impl Responder {
    let credentials = credentials.into_inner();
    if let Err(e) = credentials.validate() {
        return AppError::from(e).to_http_response();
    }

    let user = match state
        .user_service
        .login(&credentials.email, &credentials.password, credentials.remember)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return AuthError::WrongCredentials.error_response(),
        Err(e) => return e.to_http_response(),
    };

    match state.jwt_service.create_jwt(&user) {
        Ok(token) => json_success(StatusCode::OK, AuthResponse::new(token, user)),
        Err(e) => AppError::from(e).to_http_response(),
    }
}
