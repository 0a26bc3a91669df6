use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;
use std::time::Duration;

use crate::{constants::START_TIME, repositories::user::UserRepository, settings::StorageBackend, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    uptime: String,
    timestamp: String,
    start_at: String,
    version: &'static str,
    storage_backend: StorageBackend,
    storage: &'static str,
    users: Option<u64>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now_utc = Utc::now();
    let uptime = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime.num_seconds().max(0) as u64));

    let repo = &state.user_service.user_repo;
    let (storage, users) = match repo.check_connection().await {
        Ok(()) => ("OK", repo.count_users().await.ok()),
        Err(e) => {
            tracing::warn!("Health check: storage unavailable: {}", e);
            ("Unavailable", None)
        }
    };

    let response = HealthCheckResponse {
        status: if users.is_some() { "healthy" } else { "degraded" },
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        storage_backend: state.storage_backend,
        storage,
        users,
    };

    HttpResponse::Ok().json(response)
}
