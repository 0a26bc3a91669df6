use actix_web::web;
use crate::handlers::users;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users/me")
            .service(
                web::resource("")
                    .route(web::get().to(users::me))
                    .route(web::put().to(users::update_me))
            )
            .service(
                web::resource("/favorites")
                    .route(web::get().to(users::get_favorites))
            )
            .service(
                web::resource("/favorites/{media_id}")
                    .route(web::post().to(users::add_favorite))
                    .route(web::delete().to(users::remove_favorite))
            )
            .service(
                web::resource("/history")
                    .route(web::get().to(users::get_history))
                    .route(web::delete().to(users::clear_history))
            )
            .service(
                web::resource("/history/{media_id}")
                    .route(web::post().to(users::add_history))
            )
    );
}
