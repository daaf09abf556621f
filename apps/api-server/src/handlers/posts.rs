//! Post CRUD handlers.
//!
//! Reads are public; writes take a `CurrentUser` ahead of the path and body
//! extractors.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use scribe_core::domain::{PageRequest, PostDraft};
use scribe_shared::dto::PostRequest;

use crate::mapping::{page_response, post_response};
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

/// GET /api/v1/posts?page=&size=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let request = PageRequest::new(query.page, query.size)?;
    let page = state.posts.list(request).await?;

    Ok(HttpResponse::Ok().json(page_response(page)))
}

/// GET /api/v1/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let post = state.posts.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// POST /api/v1/posts
pub async fn create(
    CurrentUser(user): CurrentUser,
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let draft = PostDraft::new(req.title, req.content)?;

    let post = state.posts.create(draft, &user).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// PUT /api/v1/posts/{id}
pub async fn update(
    CurrentUser(user): CurrentUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let draft = PostDraft::new(req.title, req.content)?;

    let post = state.posts.update(path.into_inner(), draft, &user).await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete(
    CurrentUser(user): CurrentUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state.posts.delete(path.into_inner(), &user).await?;
    Ok(HttpResponse::NoContent().finish())
}
