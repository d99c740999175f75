use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::presentation::dto::UpdatePostRequest;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

const POST_COLUMNS: &str =
    "id, author_id, title, category, body, image_reference, publish_time, created_at, updated_at";

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn update_post(
        &self,
        id: Uuid,
        author_id: Uuid,
        update: UpdatePostRequest,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<(), DomainError>;
    /// Posts with `publish_time <= now`, newest first.
    async fn list_published(
        &self,
        now: DateTime<Utc>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>, DomainError>;
    /// Every post in creation order.
    async fn all_posts(&self) -> Result<Vec<Post>, DomainError>;
    async fn search_by_title(&self, fragment: &str) -> Result<Vec<Post>, DomainError>;
    async fn search_by_category(&self, fragment: &str) -> Result<Vec<Post>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn search(&self, column: &str, fragment: &str) -> Result<Vec<Post>, DomainError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE {column} ILIKE $1 ESCAPE '\\' ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(format!("%{}%", escape_like(fragment)))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error searching posts by {}: {}", column, e);
                DomainError::Internal(e.to_string())
            })
    }
}

/// Escapes LIKE wildcards so user input only matches literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts
                (id, author_id, title, category, body, image_reference, publish_time, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(&post.title)
        .bind(&post.category)
        .bind(&post.body)
        .bind(&post.image_reference)
        .bind(post.publish_time)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(post_id = %post.id, author_id = %post.author_id, category = %post.category, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error find_by_id {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn update_post(
        &self,
        id: Uuid,
        author_id: Uuid,
        update: UpdatePostRequest,
    ) -> Result<Option<Post>, DomainError> {
        let sql = format!(
            r#"
            UPDATE posts
            SET
                title = COALESCE($1, title),
                category = COALESCE($2, category),
                body = COALESCE($3, body),
                image_reference = COALESCE($4, image_reference),
                publish_time = COALESCE($5, publish_time),
                updated_at = $6
            WHERE id = $7 AND author_id = $8
            RETURNING {POST_COLUMNS}
            "#
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(update.title)
            .bind(update.category)
            .bind(update.body)
            .bind(update.image_reference)
            .bind(update.publish_time)
            .bind(Utc::now())
            .bind(id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to update post {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post)
    }

    async fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<(), DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if deleted.rows_affected() == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| DomainError::Internal(e.to_string()))?;

            return if exists {
                Err(DomainError::Forbidden)
            } else {
                Err(DomainError::PostNotFound(id))
            };
        }

        info!(post_id = %id, "post deleted with its comments");
        Ok(())
    }

    async fn list_published(
        &self,
        now: DateTime<Utc>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>, DomainError> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE publish_time <= $1
            ORDER BY publish_time DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let limit = i64::try_from(limit)
            .map_err(|_| DomainError::InvalidArgument(format!("limit out of range: {limit}")))?;
        let offset = i64::try_from(offset)
            .map_err(|_| DomainError::InvalidArgument(format!("offset out of range: {offset}")))?;
        sqlx::query_as::<_, Post>(&sql)
            .bind(now)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching published posts: {}", e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn all_posts(&self) -> Result<Vec<Post>, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at, id");
        sqlx::query_as::<_, Post>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching all posts: {}", e);
                DomainError::Internal(e.to_string())
            })
    }

    async fn search_by_title(&self, fragment: &str) -> Result<Vec<Post>, DomainError> {
        self.search("title", fragment).await
    }

    async fn search_by_category(&self, fragment: &str) -> Result<Vec<Post>, DomainError> {
        self.search("category", fragment).await
    }
}
