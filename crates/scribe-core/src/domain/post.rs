use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;
use crate::error::DomainError;

/// Maximum title length, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Post entity - a blog post owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post together with its author, resolved in the same read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: User,
}

impl PostWithAuthor {
    /// Whether `user_id` is the author of this post.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.post.author_id == user_id && self.author.id == user_id
    }
}

/// Validated title and content for a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    title: String,
    content: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.into();
        let content = content.into();

        if title.trim().is_empty() {
            return Err(DomainError::validation("title must not be blank"));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if content.trim().is_empty() {
            return Err(DomainError::validation("content must not be blank"));
        }

        Ok(Self { title, content })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_parts(self) -> (String, String) {
        (self.title, self.content)
    }
}

/// A post ready to be persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewPost {
    /// Create a new post authored by `author_id`, stamped with the current time.
    pub fn new(author_id: i64, draft: PostDraft) -> Self {
        let now = Utc::now();
        let (title, content) = draft.into_parts();
        Self {
            author_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}
