use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use actix_web::{HttpResponse, Responder, get, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

#[get("/")]
async fn index(posts: web::Data<PostService>) -> Result<HttpResponse, DomainError> {
    let page = posts.index().await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/info")]
async fn info(posts: web::Data<PostService>) -> impl Responder {
    let settings = posts.settings();
    HttpResponse::Ok().json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "latest_posts": settings.latest_posts,
        "trending_limit": settings.trending_limit,
        "media_url": settings.media_url,
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
