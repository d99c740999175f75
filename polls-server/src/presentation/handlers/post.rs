use crate::application::post_service::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PostService};
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    CreatePostRequest, ListPostsQuery, ListPostsResponse, PhotosResponse, SearchResponse,
    TrendingQuery, TrendingResponse, UpdatePostRequest,
};
use crate::presentation::extractors::AuthenticatedUser;
use crate::presentation::middleware::request_id;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

#[get("/posts")]
async fn get_posts(
    req: HttpRequest,
    posts: web::Data<PostService>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, DomainError> {
    let ListPostsQuery { limit, offset } = query.into_inner();
    let page = posts.list_posts(limit, offset).await?;

    info!(request_id = %request_id(&req), count = page.len(), "posts retrieved");

    Ok(HttpResponse::Ok().json(ListPostsResponse {
        count: page.len(),
        limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        offset: offset.unwrap_or(0),
        posts: page,
    }))
}

#[get("/posts/{id}")]
async fn get_post(
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let detail = posts.get_published_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[post("/posts")]
async fn create_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post = posts.create_post(user.id, payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/api/posts/{}", post.id)))
        .json(post))
}

#[put("/posts/{id}")]
async fn update_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = posts
        .update_post(user.id, post_id, payload.into_inner())
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post_id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/posts/{id}")]
async fn delete_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    posts.delete_post(user.id, post_id).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post_id,
        "post deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}

#[get("/trending")]
async fn trending(
    posts: web::Data<PostService>,
    query: web::Query<TrendingQuery>,
) -> Result<HttpResponse, DomainError> {
    let TrendingQuery {
        limit,
        published_only,
    } = query.into_inner();
    let ranked = posts.trending(limit, published_only).await?;
    Ok(HttpResponse::Ok().json(TrendingResponse { categories: ranked }))
}

#[get("/photos")]
async fn photos(posts: web::Data<PostService>) -> Result<HttpResponse, DomainError> {
    let photos = posts.photos().await?;
    Ok(HttpResponse::Ok().json(PhotosResponse { photos }))
}

#[get("/search/{title}")]
async fn search(
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let results = posts.search_by_title(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SearchResponse { results }))
}

#[get("/categories/{category}")]
async fn categories(
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let results = posts.search_by_category(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SearchResponse { results }))
}
