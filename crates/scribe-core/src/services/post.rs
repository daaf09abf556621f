use std::sync::Arc;

use chrono::Utc;

use crate::domain::{NewPost, Page, PageRequest, PostDraft, PostWithAuthor, User};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

const ENTITY: &str = "Post";

/// Post CRUD with ownership enforcement.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Newest posts first, each with its author.
    pub async fn list(&self, page: PageRequest) -> Result<Page<PostWithAuthor>, DomainError> {
        Ok(self.posts.list_with_authors(page).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<PostWithAuthor, DomainError> {
        self.posts
            .find_with_author(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: ENTITY,
                id,
            })
    }

    /// Create a post authored by `author`.
    pub async fn create(
        &self,
        draft: PostDraft,
        author: &User,
    ) -> Result<PostWithAuthor, DomainError> {
        let post = self.posts.insert(NewPost::new(author.id, draft)).await?;
        tracing::info!(post_id = post.id, author_id = author.id, "Post created");

        Ok(PostWithAuthor {
            post,
            author: author.clone(),
        })
    }

    /// Overwrite title and content. Only the author may update.
    pub async fn update(
        &self,
        id: i64,
        draft: PostDraft,
        requester: &User,
    ) -> Result<PostWithAuthor, DomainError> {
        let existing = self.owned_post(id, requester).await?;

        let (title, content) = draft.into_parts();
        let post = self
            .posts
            .update(id, title, content, Utc::now())
            .await
            .map_err(|e| not_found_or(e, id))?;
        tracing::info!(post_id = id, "Post updated");

        Ok(PostWithAuthor {
            post,
            author: existing.author,
        })
    }

    /// Remove a post. Only the author may delete.
    pub async fn delete(&self, id: i64, requester: &User) -> Result<(), DomainError> {
        self.owned_post(id, requester).await?;

        self.posts.delete(id).await.map_err(|e| not_found_or(e, id))?;
        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }

    /// Load a post and check `requester` is its author.
    async fn owned_post(&self, id: i64, requester: &User) -> Result<PostWithAuthor, DomainError> {
        let existing = self.get_by_id(id).await?;
        if !existing.is_owned_by(requester.id) {
            tracing::warn!(
                post_id = id,
                requester_id = requester.id,
                author_id = existing.author.id,
                "Ownership check failed"
            );
            return Err(DomainError::Forbidden("posts"));
        }
        Ok(existing)
    }
}

/// The row can vanish between the ownership read and the write.
fn not_found_or(err: RepoError, id: i64) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::NotFound {
            entity_type: ENTITY,
            id,
        },
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::domain::Post;

    /// Holds at most one post; enough to exercise the ownership rules.
    struct SinglePostRepo {
        slot: Mutex<Option<PostWithAuthor>>,
    }

    #[async_trait]
    impl PostRepository for SinglePostRepo {
        async fn list_with_authors(
            &self,
            page: PageRequest,
        ) -> Result<Page<PostWithAuthor>, RepoError> {
            let items: Vec<_> = self.slot.lock().unwrap().iter().cloned().collect();
            let total = items.len() as u64;
            Ok(Page::new(items, page, total))
        }

        async fn find_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError> {
            let slot = self.slot.lock().unwrap();
            Ok(slot.clone().filter(|p| p.post.id == id))
        }

        async fn insert(&self, _post: NewPost) -> Result<Post, RepoError> {
            Err(RepoError::Query("not supported".to_string()))
        }

        async fn update(
            &self,
            id: i64,
            title: String,
            content: String,
            updated_at: DateTime<Utc>,
        ) -> Result<Post, RepoError> {
            let mut slot = self.slot.lock().unwrap();
            match slot.as_mut().filter(|p| p.post.id == id) {
                Some(existing) => {
                    existing.post.title = title;
                    existing.post.content = content;
                    existing.post.updated_at = updated_at;
                    Ok(existing.post.clone())
                }
                None => Err(RepoError::NotFound),
            }
        }

        async fn delete(&self, id: i64) -> Result<(), RepoError> {
            let mut slot = self.slot.lock().unwrap();
            if slot.as_ref().is_some_and(|p| p.post.id == id) {
                *slot = None;
                Ok(())
            } else {
                Err(RepoError::NotFound)
            }
        }
    }

    fn user(id: i64) -> User {
        let now = Utc::now();
        User {
            id,
            email: format!("user{id}@example.com"),
            password_hash: "hash".to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn service_with_post(author: &User) -> (PostService, Arc<SinglePostRepo>) {
        let now = Utc::now();
        let repo = Arc::new(SinglePostRepo {
            slot: Mutex::new(Some(PostWithAuthor {
                post: Post {
                    id: 1,
                    author_id: author.id,
                    title: "T".to_string(),
                    content: "C".to_string(),
                    created_at: now,
                    updated_at: now,
                },
                author: author.clone(),
            })),
        });
        (PostService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_get_missing_post_is_not_found() {
        let (service, _) = service_with_post(&user(1));

        let result = service.get_by_id(99).await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound { entity_type: "Post", id: 99 })
        ));
    }

    #[tokio::test]
    async fn test_update_by_non_author_is_forbidden_and_leaves_post() {
        let author = user(1);
        let (service, repo) = service_with_post(&author);

        let draft = PostDraft::new("Hijacked", "Nope").unwrap();
        let result = service.update(1, draft, &user(2)).await;

        assert!(matches!(result, Err(DomainError::Forbidden(_))));
        let stored = repo.slot.lock().unwrap().clone().unwrap();
        assert_eq!(stored.post.title, "T");
        assert_eq!(stored.post.content, "C");
    }

    #[tokio::test]
    async fn test_update_by_author_keeps_author_and_created_at() {
        let author = user(1);
        let (service, repo) = service_with_post(&author);
        let created_at = repo.slot.lock().unwrap().as_ref().unwrap().post.created_at;

        let draft = PostDraft::new("T2", "C2").unwrap();
        let updated = service.update(1, draft, &author).await.unwrap();

        assert_eq!(updated.post.title, "T2");
        assert_eq!(updated.post.content, "C2");
        assert_eq!(updated.author.id, author.id);
        assert_eq!(updated.post.author_id, author.id);
        assert_eq!(updated.post.created_at, created_at);
        assert!(updated.post.updated_at >= created_at);
    }

    #[tokio::test]
    async fn test_delete_by_non_author_is_forbidden() {
        let (service, repo) = service_with_post(&user(1));

        let result = service.delete(1, &user(2)).await;

        assert!(matches!(result, Err(DomainError::Forbidden(_))));
        assert!(repo.slot.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_by_author_removes_post() {
        let author = user(1);
        let (service, repo) = service_with_post(&author);

        service.delete(1, &author).await.unwrap();

        assert!(repo.slot.lock().unwrap().is_none());
        assert!(matches!(
            service.delete(1, &author).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
