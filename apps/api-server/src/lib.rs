//! # Scribe API Server
//!
//! Route table, extractors and state wiring for the blog API. The binary in
//! `main.rs` only loads configuration and binds the listener.

pub mod config;
pub mod handlers;
pub mod mapping;
pub mod middleware;
pub mod state;
pub mod telemetry;
