use actix_web::{Scope, web};

use crate::presentation::handlers;

/// Every JSON endpoint, mounted under `/api`.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(handlers::index::health)
        .service(handlers::index::index)
        .service(handlers::index::info)
        .service(handlers::post::trending)
        .service(handlers::post::photos)
        .service(handlers::post::search)
        .service(handlers::post::categories)
        .service(handlers::post::get_posts)
        .service(handlers::post::create_post)
        .service(handlers::post::get_post)
        .service(handlers::post::update_post)
        .service(handlers::post::delete_post)
        .service(handlers::comment::add_comment)
        .service(handlers::comment::list_comments)
        .service(handlers::auth::scope())
}
