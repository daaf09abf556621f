//! Migration CLI tool.
//!
//! Reads `DATABASE_URL` (optionally from `.env`) and runs `up`, `down`,
//! `status`, `fresh` and the other standard sea-orm-migration commands.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    cli::run_cli(migration::Migrator).await;
}
