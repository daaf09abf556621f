//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use scribe_core::domain::{NewPost, NewUser, Page, PageRequest, Post, PostWithAuthor, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, classify};
use crate::pii::mask_email;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.find_model(id).await?.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn())
            .await
            .map_err(classify)?;

        Ok(result.map(Into::into))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(self.conn())
            .await
            .map_err(classify)?;

        Ok(count > 0)
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, RepoError> {
        let model = user::ActiveModel::from(new_user)
            .insert(self.conn())
            .await
            .map_err(classify)?;

        Ok(model.into())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_with_authors(
        &self,
        page: PageRequest,
    ) -> Result<Page<PostWithAuthor>, RepoError> {
        let paginator = PostEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .paginate(self.conn(), page.size());

        let total = paginator.num_items().await.map_err(classify)?;
        let rows = paginator.fetch_page(page.page()).await.map_err(classify)?;

        let items = rows
            .into_iter()
            .map(with_author)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, page, total))
    }

    async fn find_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(self.conn())
            .await
            .map_err(classify)?;

        row.map(with_author).transpose()
    }

    async fn insert(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel::from(new_post)
            .insert(self.conn())
            .await
            .map_err(classify)?;

        Ok(model.into())
    }

    async fn update(
        &self,
        id: i64,
        title: String,
        content: String,
        updated_at: DateTime<Utc>,
    ) -> Result<Post, RepoError> {
        let changes = post::ActiveModel {
            id: Unchanged(id),
            title: Set(title),
            content: Set(content),
            updated_at: Set(updated_at.into()),
            ..Default::default()
        };

        let model = changes.update(self.conn()).await.map_err(classify)?;
        Ok(model.into())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.delete_by_id(id).await
    }
}

/// Join result to domain; the foreign key guarantees the author row exists.
fn with_author(row: (post::Model, Option<user::Model>)) -> Result<PostWithAuthor, RepoError> {
    match row {
        (post, Some(author)) => Ok(PostWithAuthor {
            post: post.into(),
            author: author.into(),
        }),
        (post, None) => Err(RepoError::Query(format!(
            "post {} references missing author {}",
            post.id, post.author_id
        ))),
    }
}
