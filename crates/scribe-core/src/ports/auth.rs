//! Authentication ports: token issuance and password hashing.

use async_trait::async_trait;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: i64,
    pub email: String,
    pub exp: i64,
}

/// Token service trait for issuing and validating access tokens.
pub trait TokenService: Send + Sync {
    /// Generate an access token for a user.
    fn generate_token(&self, user_id: i64, email: &str) -> Result<String, AuthError>;

    /// Validate signature, issuer and expiry, and decode the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of newly issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
///
/// Hashing is CPU and memory heavy; implementations must not block the calling
/// executor thread.
#[async_trait]
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    async fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;

    /// Do the work of a failed `verify` when there is no stored hash, so an
    /// unknown account takes as long to reject as a wrong password.
    async fn verify_decoy(&self, password: &str) -> Result<(), AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
