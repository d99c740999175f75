#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, web};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use polls_server::application::auth_service::AuthService;
use polls_server::application::comment_service::CommentService;
use polls_server::application::post_service::{FeedSettings, PostService};
use polls_server::data::comment_repository::CommentRepository;
use polls_server::data::post_repository::PostRepository;
use polls_server::data::user_repository::UserRepository;
use polls_server::domain::comment::Comment;
use polls_server::domain::error::DomainError;
use polls_server::domain::post::Post;
use polls_server::domain::user::User;
use polls_server::infrastructure::security::JwtKeys;
use polls_server::presentation::dto::UpdatePostRequest;
use polls_server::presentation::middleware::RequestContextMiddleware;
use polls_server::presentation::routes::api_scope;

pub const JWT_SECRET: &str = "integration-test-secret";

/// Posts, comments and users kept in memory; deleting a post drops its comments.
#[derive(Default)]
pub struct InMemoryStore {
    posts: Mutex<Vec<Post>>,
    comments: Mutex<Vec<Comment>>,
    users: Mutex<Vec<User>>,
    users_unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Stores a post published `days` from now (negative for the past).
    pub fn seed_post(&self, title: &str, category: &str, days: i64) -> Post {
        self.seed_post_at(title, category, Utc::now() + Duration::days(days))
    }

    pub fn seed_post_at(&self, title: &str, category: &str, publish_time: DateTime<Utc>) -> Post {
        let post = Post::new(
            Uuid::new_v4(),
            title.into(),
            category.into(),
            "Lorem ipsum dolor sit amet.".into(),
            format!("photos/{}.png", title.to_lowercase().replace(' ', "-")),
            publish_time,
        )
        .unwrap();
        self.posts.lock().unwrap().push(post.clone());
        post
    }

    pub fn comment_count(&self, post_id: Uuid) -> usize {
        self.comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .count()
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    /// Makes every later user lookup by id fail with a storage error.
    pub fn fail_user_lookups(&self) {
        self.users_unavailable.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn update_post(
        &self,
        id: Uuid,
        author_id: Uuid,
        update: UpdatePostRequest,
    ) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.lock().unwrap();
        let Some(post) = posts
            .iter_mut()
            .find(|p| p.id == id && p.author_id == author_id)
        else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            post.title = title;
        }
        if let Some(category) = update.category {
            post.category = category;
        }
        if let Some(body) = update.body {
            post.body = body;
        }
        if let Some(image_reference) = update.image_reference {
            post.image_reference = image_reference;
        }
        if let Some(publish_time) = update.publish_time {
            post.publish_time = publish_time;
        }
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<(), DomainError> {
        let mut posts = self.posts.lock().unwrap();
        let position = posts.iter().position(|p| p.id == id);
        match position {
            None => Err(DomainError::PostNotFound(id)),
            Some(index) if posts[index].author_id != author_id => Err(DomainError::Forbidden),
            Some(index) => {
                posts.remove(index);
                self.comments.lock().unwrap().retain(|c| c.post_id != id);
                Ok(())
            }
        }
    }

    async fn list_published(
        &self,
        now: DateTime<Utc>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>, DomainError> {
        let mut published: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.publish_time <= now)
            .cloned()
            .collect();
        published.sort_by(|a, b| b.publish_time.cmp(&a.publish_time));
        Ok(published.into_iter().skip(offset).take(limit).collect())
    }

    async fn all_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn search_by_title(&self, fragment: &str) -> Result<Vec<Post>, DomainError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn search_by_category(&self, fragment: &str) -> Result<Vec<Post>, DomainError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.category.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        if !self.posts.lock().unwrap().iter().any(|p| p.id == comment.post_id) {
            return Err(DomainError::PostNotFound(comment.post_id));
        }
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::UserAlreadyExists(
                "email already registered".to_string(),
            ));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        if self.users_unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Internal("user store unavailable".to_string()));
        }
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }
}

pub fn post_service(store: &Arc<InMemoryStore>) -> PostService {
    PostService::new(store.clone(), store.clone(), FeedSettings::default())
}

pub fn comment_service(store: &Arc<InMemoryStore>) -> CommentService {
    CommentService::new(store.clone(), store.clone())
}

pub fn auth_service(store: &Arc<InMemoryStore>) -> AuthService {
    AuthService::new(store.clone(), JwtKeys::new(JWT_SECRET.to_string(), 3600))
}

/// The API wired to `store`, ready for `actix_web::test::init_service`.
pub fn app(
    store: Arc<InMemoryStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RequestContextMiddleware)
        .app_data(web::Data::new(post_service(&store)))
        .app_data(web::Data::new(comment_service(&store)))
        .app_data(web::Data::new(auth_service(&store)))
        .service(api_scope())
}
