//! In-memory implementation of the user and post repositories.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use scribe_core::domain::{NewPost, NewUser, Page, PageRequest, Post, PostWithAuthor, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{PostRepository, UserRepository};

use crate::pii::mask_email;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    next_user_id: i64,
    next_post_id: i64,
}

impl Tables {
    fn with_author(&self, post: &Post) -> Result<PostWithAuthor, RepoError> {
        let author = self.users.get(&post.author_id).ok_or_else(|| {
            RepoError::Query(format!(
                "post {} references missing author {}",
                post.id, post.author_id
            ))
        })?;

        Ok(PostWithAuthor {
            post: post.clone(),
            author: author.clone(),
        })
    }
}

/// Both repositories over one lock, so the users/posts foreign key holds.
///
/// Ids are assigned sequentially from 1. Each operation takes the lock once,
/// which makes every single-row write atomic.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| u.email == email))
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(RepoError::Constraint("users.email must be unique".to_string()));
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            created_at: new_user.created_at,
            updated_at: new_user.updated_at,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list_with_authors(
        &self,
        page: PageRequest,
    ) -> Result<Page<PostWithAuthor>, RepoError> {
        let tables = self.tables.read().await;

        let mut posts: Vec<&Post> = tables.posts.values().collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = posts.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.size()).unwrap_or(usize::MAX);

        let items = posts
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|post| tables.with_author(post))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, page, total))
    }

    async fn find_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError> {
        let tables = self.tables.read().await;
        tables
            .posts
            .get(&id)
            .map(|post| tables.with_author(post))
            .transpose()
    }

    async fn insert(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&new_post.author_id) {
            return Err(RepoError::Constraint(format!(
                "posts.author_id {} does not reference a user",
                new_post.author_id
            )));
        }

        tables.next_post_id += 1;
        let post = Post {
            id: tables.next_post_id,
            author_id: new_post.author_id,
            title: new_post.title,
            content: new_post.content,
            created_at: new_post.created_at,
            updated_at: new_post.updated_at,
        };
        tables.posts.insert(post.id, post.clone());

        Ok(post)
    }

    async fn update(
        &self,
        id: i64,
        title: String,
        content: String,
        updated_at: DateTime<Utc>,
    ) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;

        post.title = title;
        post.content = content;
        post.updated_at = updated_at;

        Ok(post.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}
