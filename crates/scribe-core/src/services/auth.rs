use std::sync::Arc;

use super::UserService;
use crate::domain::User;
use crate::error::DomainError;
use crate::ports::{PasswordService, TokenService};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

/// Credential verification and token-based identity resolution.
#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: UserService,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Verify credentials and issue a signed token.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, DomainError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            if let Err(e) = self.passwords.verify_decoy(password).await {
                tracing::warn!(error = %e, "Decoy password verification failed");
            }
            return Err(DomainError::InvalidCredentials);
        };

        if !self.passwords.verify(password, &user.password_hash).await? {
            tracing::debug!(user_id = user.id, "Password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.tokens.generate_token(user.id, &user.email)?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok(AuthSession {
            token,
            expires_in: self.tokens.expiration_seconds(),
            user,
        })
    }

    /// Resolve a bearer token to the user it was issued for.
    pub async fn current_user(&self, token: &str) -> Result<User, DomainError> {
        let claims = self.tokens.validate_token(token)?;
        self.users.load_principal(claims.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::domain::NewUser;
    use crate::error::RepoError;
    use crate::ports::{AuthError, TokenClaims, UserRepository};

    /// Holds a single account, `a@x.com`.
    struct OneUserRepo;

    fn stored_user() -> User {
        let now = Utc::now();
        User {
            id: 1,
            email: "a@x.com".to_string(),
            password_hash: "plain:pw1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl UserRepository for OneUserRepo {
        async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
            Ok(Some(stored_user()).filter(|u| u.id == id))
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
            Ok(Some(stored_user()).filter(|u| u.email == email))
        }

        async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
            Ok(email == "a@x.com")
        }

        async fn insert(&self, _user: NewUser) -> Result<User, RepoError> {
            Err(RepoError::Query("read only".to_string()))
        }
    }

    /// Counts every verification, real or decoy.
    #[derive(Default)]
    struct CountingPasswords {
        verifications: AtomicUsize,
        decoys: AtomicUsize,
    }

    #[async_trait]
    impl PasswordService for CountingPasswords {
        async fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("plain:{password}"))
        }

        async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
            self.verifications.fetch_add(1, Ordering::SeqCst);
            Ok(hash == format!("plain:{password}"))
        }

        async fn verify_decoy(&self, _password: &str) -> Result<(), AuthError> {
            self.decoys.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FixedTokens;

    impl TokenService for FixedTokens {
        fn generate_token(&self, user_id: i64, _email: &str) -> Result<String, AuthError> {
            Ok(format!("token-{user_id}"))
        }

        fn validate_token(&self, _token: &str) -> Result<TokenClaims, AuthError> {
            Err(AuthError::InvalidToken("not supported".to_string()))
        }

        fn expiration_seconds(&self) -> i64 {
            3600
        }
    }

    fn service(passwords: Arc<CountingPasswords>) -> AuthService {
        let users = UserService::new(Arc::new(OneUserRepo), passwords.clone());
        AuthService::new(users, passwords, Arc::new(FixedTokens))
    }

    #[tokio::test]
    async fn test_unknown_email_still_pays_for_a_verification() {
        let passwords = Arc::new(CountingPasswords::default());
        let auth = service(passwords.clone());

        let err = auth.login("ghost@x.com", "pw1").await.unwrap_err();

        assert!(matches!(err, DomainError::InvalidCredentials));
        assert_eq!(passwords.decoys.load(Ordering::SeqCst), 1);
        assert_eq!(passwords.verifications.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_wrong_password_verifies_once() {
        let passwords = Arc::new(CountingPasswords::default());
        let auth = service(passwords.clone());

        let err = auth.login("a@x.com", "nope").await.unwrap_err();

        assert!(matches!(err, DomainError::InvalidCredentials));
        assert_eq!(passwords.verifications.load(Ordering::SeqCst), 1);
        assert_eq!(passwords.decoys.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_login_issues_token_and_lifetime() {
        let auth = service(Arc::new(CountingPasswords::default()));

        let session = auth.login("A@X.com", "pw1").await.unwrap();

        assert_eq!(session.token, "token-1");
        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.user.email, "a@x.com");
    }
}
