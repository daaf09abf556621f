//! PostgreSQL persistence via SeaORM.

mod connections;
mod postgres_base;
pub mod postgres_repo;

pub mod entity;

pub use connections::{DatabaseConfig, connect};
pub use postgres_repo::{PostgresPostRepository, PostgresUserRepository};
