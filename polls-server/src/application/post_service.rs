use std::sync::Arc;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::{CATEGORY_MAX_CHARS, Post, TITLE_MAX_CHARS, check_length};
use crate::domain::ranking::{CategoryCount, CategoryRanker};
use crate::presentation::dto::{
    CreatePostRequest, IndexResponse, PostDetailResponse, UpdatePostRequest,
};
use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Site-level knobs for the public pages.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub latest_posts: usize,
    pub trending_limit: i64,
    pub media_url: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            latest_posts: 5,
            trending_limit: crate::domain::ranking::DEFAULT_TRENDING_LIMIT,
            media_url: "/media/".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    settings: FeedSettings,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        settings: FeedSettings,
    ) -> Self {
        Self {
            posts,
            comments,
            settings,
        }
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    /// Latest published posts and the trending categories over every post.
    #[instrument(skip(self))]
    pub async fn index(&self) -> Result<IndexResponse, DomainError> {
        let latest_posts = self
            .posts
            .list_published(Utc::now(), self.settings.latest_posts, 0)
            .await?;
        let all = self.posts.all_posts().await?;
        let categories = CategoryRanker::new(self.settings.trending_limit)?.rank(&all);

        Ok(IndexResponse {
            latest_posts,
            categories,
        })
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    /// A post with its comments. Posts scheduled for the future are hidden.
    pub async fn get_published_post(&self, id: Uuid) -> Result<PostDetailResponse, DomainError> {
        let now = Utc::now();
        let post = self.get_post(id).await?;
        if !post.is_published(now) {
            debug!(post_id = %id, publish_time = %post.publish_time, "post not published yet");
            return Err(DomainError::PostNotFound(id));
        }

        let comments = self.comments.list_for_post(id).await?;
        Ok(PostDetailResponse {
            published_recently: post.was_published_recently(now),
            post,
            comments,
        })
    }

    pub async fn list_posts(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Post>, DomainError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0);
        if i64::try_from(offset).is_err() {
            return Err(DomainError::InvalidArgument(format!(
                "offset must be at most {}, got {offset}",
                i64::MAX
            )));
        }
        self.posts.list_published(Utc::now(), limit, offset).await
    }

    #[instrument(skip(self))]
    pub async fn trending(
        &self,
        limit: Option<i64>,
        published_only: bool,
    ) -> Result<Vec<CategoryCount>, DomainError> {
        let ranker = CategoryRanker::new(limit.unwrap_or(self.settings.trending_limit))?;
        let mut posts = self.posts.all_posts().await?;
        if published_only {
            let now = Utc::now();
            posts.retain(|post| post.is_published(now));
        }
        Ok(ranker.rank(&posts))
    }

    pub async fn search_by_title(&self, fragment: &str) -> Result<Vec<Post>, DomainError> {
        self.posts.search_by_title(fragment).await
    }

    pub async fn search_by_category(&self, fragment: &str) -> Result<Vec<Post>, DomainError> {
        self.posts.search_by_category(fragment).await
    }

    /// Image URLs of all posts that have one, in storage order.
    pub async fn photos(&self) -> Result<Vec<String>, DomainError> {
        let posts = self.posts.all_posts().await?;
        Ok(posts
            .iter()
            .filter(|post| !post.image_reference.is_empty())
            .map(|post| media_url(&self.settings.media_url, &post.image_reference))
            .collect())
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_post(
        &self,
        author_id: Uuid,
        request: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let post = Post::new(
            author_id,
            request.title,
            request.category,
            request.body,
            request.image_reference,
            request.publish_time.unwrap_or_else(Utc::now),
        )?;
        self.posts.create(post).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_post(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        update: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let existing = self.get_post(post_id).await?;
        if existing.author_id != author_id {
            return Err(DomainError::Forbidden);
        }
        if let Some(title) = &update.title {
            check_length("title", title, TITLE_MAX_CHARS)?;
        }
        if let Some(category) = &update.category {
            check_length("category", category, CATEGORY_MAX_CHARS)?;
        }

        self.posts
            .update_post(post_id, author_id, update)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, author_id: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        self.posts.delete_post(post_id, author_id).await
    }
}

fn media_url(prefix: &str, reference: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}
