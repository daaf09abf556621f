use std::sync::Arc;

use crate::domain::{NewUser, Registration, User, normalize_email};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, UserRepository};

/// Registration and lookup of user accounts.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Register a new account. The password is hashed before it is stored.
    pub async fn register(&self, registration: Registration) -> Result<User, DomainError> {
        if self.users.exists_by_email(registration.email()).await? {
            return Err(DomainError::DuplicateEmail(registration.email().to_string()));
        }

        let password_hash = self.passwords.hash(registration.password()).await?;
        let new_user = NewUser::new(&registration, password_hash);

        // A concurrent registration can still win the race to the unique index.
        let user = self.users.insert(new_user).await.map_err(|e| match e {
            RepoError::Constraint(_) => {
                DomainError::DuplicateEmail(registration.email().to_string())
            }
            other => other.into(),
        })?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_email(&normalize_email(email)).await?)
    }

    /// Resolve an authenticated identifier to the current user record.
    pub async fn load_principal(&self, user_id: i64) -> Result<User, DomainError> {
        self.users.find_by_id(user_id).await?.ok_or_else(|| {
            DomainError::Unauthenticated(format!("user {user_id} no longer exists"))
        })
    }
}
