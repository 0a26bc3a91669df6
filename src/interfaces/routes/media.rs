use actix_web::web;
use crate::handlers::{comments, images, media};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/media")
            .service(
                web::resource("")
                    .route(web::get().to(media::list_media))
                    .route(web::post().to(media::upload_media))
            )
            // Registered before "/{id}" so "recent" is not taken for an id.
            .service(
                web::resource("/recent")
                    .route(web::get().to(media::recent_media))
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(media::get_media))
                    .route(web::put().to(media::update_media))
                    .route(web::delete().to(media::delete_media))
            )
            .service(
                web::resource("/{id}/comments")
                    .route(web::get().to(comments::list_comments))
                    .route(web::post().to(comments::add_comment))
            )
    );

    cfg.service(
        web::resource("/comments/{id}")
            .route(web::delete().to(comments::delete_comment))
    );

    cfg.service(
        web::resource("/images/{id}")
            .route(web::get().to(images::get_image))
    );
}
