//! Application state - repositories wired into services, shared by all handlers.

use std::sync::Arc;

use scribe_core::ports::{PasswordService, PostRepository, RateLimiter, TokenService, UserRepository};
use scribe_core::{AuthService, PostService, UserService};
use scribe_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use scribe_infra::{PostgresPostRepository, PostgresUserRepository, database};

#[cfg(feature = "rate-limit")]
use scribe_infra::InMemoryRateLimiter;

use crate::config::AppConfig;

/// Failures while building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Database connection failed: {0}")]
    Database(String),

    #[error("Invalid password hashing configuration: {0}")]
    PasswordHashing(String),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub auth: AuthService,
    pub posts: PostService,
    /// Limiter for the credential endpoints; `None` disables limiting.
    pub auth_limiter: Option<Arc<dyn RateLimiter>>,
    /// Key the limiter on proxy headers instead of the peer address.
    pub trust_forwarded_headers: bool,
}

impl AppState {
    /// Build the application state with the implementations the config selects.
    ///
    /// With `DATABASE_URL` set the PostgreSQL repositories are used and a failed
    /// connection is fatal; without it everything lives in memory.
    pub async fn new(config: &AppConfig) -> Result<Self, StateError> {
        let passwords: Arc<dyn PasswordService> = Arc::new(
            Argon2PasswordService::with_config(config.argon2)
                .map_err(|e| StateError::PasswordHashing(e.to_string()))?,
        );
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        let (users, posts) = Self::repositories(config).await?;

        #[cfg(feature = "rate-limit")]
        let auth_limiter: Option<Arc<dyn RateLimiter>> = Some(Arc::new(InMemoryRateLimiter::new(
            config.rate_limit.clone(),
        )));

        #[cfg(not(feature = "rate-limit"))]
        let auth_limiter: Option<Arc<dyn RateLimiter>> = None;

        tracing::info!("Application state initialized");

        let mut state = Self::wire(users, posts, passwords, tokens, auth_limiter);
        state.trust_forwarded_headers = config.trust_forwarded_headers;

        Ok(state)
    }

    /// Explicit constructor wiring: repositories into services.
    pub fn wire(
        user_repo: Arc<dyn UserRepository>,
        post_repo: Arc<dyn PostRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        auth_limiter: Option<Arc<dyn RateLimiter>>,
    ) -> Self {
        let users = UserService::new(user_repo, passwords.clone());
        let auth = AuthService::new(users.clone(), passwords, tokens);
        let posts = PostService::new(post_repo);

        Self {
            users,
            auth,
            posts,
            auth_limiter,
            trust_forwarded_headers: false,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(
        config: &AppConfig,
    ) -> Result<(Arc<dyn UserRepository>, Arc<dyn PostRepository>), StateError> {
        match &config.database {
            Some(db_config) => {
                let conn = Arc::new(
                    database::connect(db_config)
                        .await
                        .map_err(|e| StateError::Database(e.to_string()))?,
                );

                Ok((
                    Arc::new(PostgresUserRepository::new(conn.clone())),
                    Arc::new(PostgresPostRepository::new(conn)),
                ))
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Ok(Self::in_memory())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(
        _config: &AppConfig,
    ) -> Result<(Arc<dyn UserRepository>, Arc<dyn PostRepository>), StateError> {
        tracing::info!("Running without postgres feature - using in-memory store");
        Ok(Self::in_memory())
    }

    fn in_memory() -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>) {
        let store = Arc::new(InMemoryStore::new());
        (store.clone(), store)
    }
}
