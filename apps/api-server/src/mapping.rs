//! Domain to wire conversions.

use scribe_core::domain::{Page, PostWithAuthor, User};
use scribe_shared::dto::{PageResponse, PostResponse, UserResponse};

/// Public view of a user. The password hash never leaves the server.
pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        created_at: user.created_at,
    }
}

pub fn post_response(entry: PostWithAuthor) -> PostResponse {
    PostResponse {
        id: entry.post.id,
        title: entry.post.title,
        content: entry.post.content,
        author: user_response(&entry.author),
        created_at: entry.post.created_at,
        updated_at: entry.post.updated_at,
    }
}

pub fn page_response(page: Page<PostWithAuthor>) -> PageResponse<PostResponse> {
    let page = page.map(post_response);
    PageResponse {
        content: page.items,
        page: page.page,
        size: page.size,
        total_elements: page.total_items,
        total_pages: page.total_pages,
    }
}
