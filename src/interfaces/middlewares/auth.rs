use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage, HttpResponse,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{entities::token::Claims, errors::AuthError, AppState};

/// Requires a valid bearer token on every route except the public read-only ones
/// and the auth endpoints. Verified claims are stored in the request extensions.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public_route(req.path(), req.method()) {
                return service.call(req).await;
            }

            let claims = match get_valid_claims(&req) {
                Ok(claims) => claims,
                Err(AuthError::MissingJwtService) => {
                    tracing::error!("AppState missing in auth middleware");
                    return Ok(unauthorized(req, StatusKind::Internal, "Internal server error"));
                }
                Err(AuthError::MissingCredentials) => {
                    tracing::warn!("Missing or malformed Authorization header");
                    return Ok(unauthorized(req, StatusKind::Unauthorized, "Missing or invalid credentials"));
                }
                Err(e) => {
                    tracing::warn!("Rejected bearer token: {}", e);
                    return Ok(unauthorized(req, StatusKind::Unauthorized, &e.to_string()));
                }
            };

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

enum StatusKind {
    Unauthorized,
    Internal,
}

fn is_public_route(path: &str, method: &Method) -> bool {
    if method == Method::OPTIONS {
        return true;
    }

    if path == "/" || path == "/health" {
        return true;
    }

    if method == Method::POST {
        return matches!(path, "/api/auth/login" | "/api/auth/register");
    }

    method == Method::GET
        && (path.starts_with("/api/media") || path.starts_with("/api/images/"))
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

fn get_valid_claims(req: &ServiceRequest) -> Result<Claims, AuthError> {
    let state = req.app_data::<web::Data<AppState>>()
        .ok_or(AuthError::MissingJwtService)?;

    let token = extract_token(req).ok_or(AuthError::MissingCredentials)?;
    let decoded = state.jwt_service.decode_jwt(&token)?;
    Ok(decoded.claims)
}

fn unauthorized(req: ServiceRequest, kind: StatusKind, message: &str) -> ServiceResponse<BoxBody> {
    let body = serde_json::json!({ "success": false, "error": message });
    let response = match kind {
        StatusKind::Unauthorized => HttpResponse::Unauthorized().json(body),
        StatusKind::Internal => HttpResponse::InternalServerError().json(body),
    };
    req.into_response(response)
}
