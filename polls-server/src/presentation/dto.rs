use crate::domain::comment::Comment;
use crate::domain::post::Post;
use crate::domain::ranking::CategoryCount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ======================= AUTH =======================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl AuthResponse {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}

// ======================= POSTS =======================

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub image_reference: String,
    pub publish_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub body: Option<String>,
    pub image_reference: Option<String>,
    pub publish_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListPostsResponse {
    pub posts: Vec<Post>,
    /// Number of posts on this page.
    pub count: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: Post,
    pub comments: Vec<Comment>,
    pub published_recently: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Post>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhotosResponse {
    pub photos: Vec<String>,
}

// ======================= INDEX =======================

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub latest_posts: Vec<Post>,
    pub categories: Vec<CategoryCount>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<i64>,
    #[serde(default)]
    pub published_only: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrendingResponse {
    pub categories: Vec<CategoryCount>,
}

// ======================= COMMENTS =======================

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub name: String,
    pub body: String,
}
