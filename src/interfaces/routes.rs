use actix_web::web;

use crate::handlers::system::health_check;

mod auth;
mod json_error;
mod media;
mod users;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));

    cfg.service(
        web::scope("/api")
            .configure(auth::config_routes)
            .configure(users::config_routes)
            .configure(media::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
