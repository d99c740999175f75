use crate::application::comment_service::CommentService;
use crate::domain::error::DomainError;
use crate::presentation::dto::CreateCommentRequest;
use crate::presentation::middleware::request_id;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;
use uuid::Uuid;

#[post("/posts/{id}/comments")]
async fn add_comment(
    req: HttpRequest,
    comments: web::Data<CommentService>,
    path: web::Path<Uuid>,
    payload: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let CreateCommentRequest { name, body } = payload.into_inner();
    let comment = comments.add_comment(post_id, name, body).await?;

    info!(
        request_id = %request_id(&req),
        post_id = %post_id,
        comment_id = %comment.id,
        "comment added"
    );

    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/api/posts/{post_id}")))
        .json(comment))
}

#[get("/posts/{id}/comments")]
async fn list_comments(
    comments: web::Data<CommentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let comments = comments.comments_for(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}
