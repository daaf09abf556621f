use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewPost, NewUser, Page, PageRequest, Post, PostWithAuthor, User};
use crate::error::RepoError;

/// User persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError>;

    /// Find a user by their (normalized) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError>;

    /// Insert a new user. Fails with [`RepoError::Constraint`] if the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, RepoError>;
}

/// Post persistence. Every read returns the author alongside the post.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// List posts newest first (`created_at` desc, then `id` desc).
    async fn list_with_authors(
        &self,
        page: PageRequest,
    ) -> Result<Page<PostWithAuthor>, RepoError>;

    async fn find_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError>;

    /// Insert a new post. Fails with [`RepoError::Constraint`] if the author does not exist.
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Overwrite title and content. Author and `created_at` are never touched.
    async fn update(
        &self,
        id: i64,
        title: String,
        content: String,
        updated_at: DateTime<Utc>,
    ) -> Result<Post, RepoError>;

    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}
