use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const MAX_EMAIL_LEN: usize = 255;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_NAME_LEN: usize = 100;

/// User entity - a registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user ready to be persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewUser {
    /// Build a new user from a validated registration and an already-hashed password.
    pub fn new(registration: &Registration, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            email: registration.email.clone(),
            password_hash,
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated registration input.
///
/// Emails are normalized (trimmed, lower-cased) so uniqueness is
/// case-insensitive.
#[derive(Debug, Clone)]
pub struct Registration {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
}

impl Registration {
    pub fn new(
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Self, DomainError> {
        let email = normalize_email(email);
        validate_email(&email)?;

        if password.trim().is_empty() {
            return Err(DomainError::validation("password must not be blank"));
        }
        if password.chars().count() > MAX_PASSWORD_LEN {
            return Err(DomainError::validation(format!(
                "password must be at most {MAX_PASSWORD_LEN} characters"
            )));
        }

        let first_name = validate_name("firstName", first_name)?;
        let last_name = validate_name("lastName", last_name)?;

        Ok(Self {
            email,
            password: password.to_string(),
            first_name,
            last_name,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

/// Canonical form of an email address used for storage and lookup.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.is_empty() {
        return Err(DomainError::validation("email must not be blank"));
    }
    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(DomainError::validation(format!(
            "email must be at most {MAX_EMAIL_LEN} characters"
        )));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DomainError::validation("email must be a valid email address"))
    }
}

fn validate_name(field: &str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be blank")));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(value.to_string())
}
