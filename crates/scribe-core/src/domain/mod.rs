//! Domain entities - the core business objects.

mod page;
mod post;
mod user;

pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest};
pub use post::{MAX_TITLE_LEN, NewPost, Post, PostDraft, PostWithAuthor};
pub use user::{NewUser, Registration, User};
pub(crate) use user::normalize_email;
