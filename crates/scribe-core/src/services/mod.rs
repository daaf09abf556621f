//! Application services - orchestrate ports into use cases.
//!
//! Services are wired explicitly through their constructors; nothing is
//! resolved from ambient state.

mod auth;
mod post;
mod user;

pub use auth::{AuthService, AuthSession};
pub use post::PostService;
pub use user::UserService;
