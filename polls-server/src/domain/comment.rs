use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::post::check_length;

pub const AUTHOR_MAX_CHARS: usize = 20;
pub const BODY_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author: String, body: String) -> Result<Self, DomainError> {
        let author = author.trim().to_string();
        if author.is_empty() {
            return Err(DomainError::Validation("author must not be blank".into()));
        }
        if body.trim().is_empty() {
            return Err(DomainError::Validation("body must not be blank".into()));
        }
        check_length("author", &author, AUTHOR_MAX_CHARS)?;
        check_length("body", &body, BODY_MAX_CHARS)?;

        Ok(Self {
            id: Uuid::new_v4(),
            post_id,
            author,
            body,
            created_at: Utc::now(),
        })
    }
}
