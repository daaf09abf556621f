//! # Scribe Core
//!
//! The domain layer of the Scribe blog API.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, typed errors, the ports infrastructure must implement, and the
//! services that orchestrate them.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use services::{AuthService, AuthSession, PostService, UserService};
