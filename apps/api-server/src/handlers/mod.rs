//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod tags;
mod users;


use actix_web::web;

use crate::middleware::error::{json_error_handler, path_error_handler, query_error_handler};

/// Configure extractor error handling and all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/users")
                    .route("", web::post().to(users::create))
                    .route("", web::get().to(users::list))
                    .route("/by-username/{username}", web::get().to(users::get_by_username))
                    .route("/{id}", web::get().to(users::get))
                    .route("/{id}", web::patch().to(users::update))
                    .route("/{id}", web::delete().to(users::delete))
                    .route("/{id}/posts", web::get().to(users::posts))
                    .route("/{id}/comments", web::get().to(comments::list_by_author))
                    .route("/{id}/post-stats", web::get().to(users::post_stats)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::post().to(categories::create))
                    .route("", web::get().to(categories::list))
                    .route("/by-name/{name}", web::get().to(categories::get_by_name))
                    .route("/{id}", web::get().to(categories::get))
                    .route("/{id}", web::delete().to(categories::delete))
                    .route("/{id}/posts", web::get().to(categories::posts)),
            )
            .service(
                web::scope("/tags")
                    .route("", web::post().to(tags::create))
                    .route("", web::get().to(tags::list))
                    .route("/{id}", web::get().to(tags::get))
                    .route("/{id}", web::delete().to(tags::delete)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create))
                    .route("", web::get().to(posts::list))
                    .route("/slug/{slug}", web::get().to(posts::get_by_slug))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::patch().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/comments", web::get().to(comments::list_for_post)),
            )
            .service(
                web::scope("/comments")
                    .route("", web::post().to(comments::create))
                    .route("/{id}", web::delete().to(comments::delete)),
            ),
    );
}
