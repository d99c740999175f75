use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

pub const TITLE_MAX_CHARS: usize = 40;
pub const CATEGORY_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub body: String,
    #[serde(default)]
    pub image_reference: String,
    pub publish_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        author_id: Uuid,
        title: String,
        category: String,
        body: String,
        image_reference: String,
        publish_time: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        check_length("title", &title, TITLE_MAX_CHARS)?;
        check_length("category", &category, CATEGORY_MAX_CHARS)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            category,
            body,
            image_reference,
            publish_time,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.publish_time <= now
    }

    /// Published within the day leading up to `now`. Future posts never count.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        now - Duration::days(1) <= self.publish_time && self.publish_time <= now
    }
}

/// Rejects values longer than `max` characters.
pub fn check_length(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::Validation(format!(
            "{field} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}
