//! Argon2id password hashing.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use async_trait::async_trait;

use scribe_core::ports::{AuthError, PasswordService};

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Config {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// 19 MiB, 2 passes, 1 lane.
impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl Argon2Config {
    /// Read `ARGON2_MEMORY_KIB`, `ARGON2_ITERATIONS` and `ARGON2_PARALLELISM`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str, default: u32| {
            lookup(key)
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        };

        Self {
            memory_kib: read("ARGON2_MEMORY_KIB", defaults.memory_kib),
            iterations: read("ARGON2_ITERATIONS", defaults.iterations),
            parallelism: read("ARGON2_PARALLELISM", defaults.parallelism),
        }
    }
}

/// Argon2id (v0x13) password service.
///
/// Each hash gets its own random salt and is stored as a PHC string, so the
/// parameters travel with the hash and verification keeps working if they
/// are raised later. All hashing runs on the blocking thread pool.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
    /// Hash of a random password at the configured cost, for `verify_decoy`.
    decoy_hash: String,
}

impl Argon2PasswordService {
    /// Build with explicit cost parameters; rejects values argon2 cannot use.
    pub fn with_config(config: Argon2Config) -> Result<Self, AuthError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AuthError::HashingError(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy_password = SaltString::generate(&mut OsRng);
        let decoy_hash = hash_with(&argon2, decoy_password.as_str())?;

        Ok(Self { argon2, decoy_hash })
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::HashingError(e.to_string()))
}

fn verify_with(argon2: &Argon2<'_>, password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

async fn off_thread<T, F>(work: F) -> Result<T, AuthError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::HashingError(format!("hashing task failed: {e}")))?
}

#[async_trait]
impl PasswordService for Argon2PasswordService {
    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();

        off_thread(move || hash_with(&argon2, &password)).await
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();

        off_thread(move || verify_with(&argon2, &password, &hash)).await
    }

    async fn verify_decoy(&self, password: &str) -> Result<(), AuthError> {
        self.verify(password, &self.decoy_hash).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2PasswordService {
        Argon2PasswordService::with_config(Argon2Config {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let service = Argon2PasswordService::with_config(Argon2Config::default()).unwrap();

        let hash = service.hash("pw1").await.unwrap();

        assert!(hash.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
        assert!(service.verify("pw1", &hash).await.unwrap());
        assert!(!service.verify("pw2", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_salts_differ_per_hash() {
        let service = cheap();

        let a = service.hash("same").await.unwrap();
        let b = service.hash("same").await.unwrap();

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_hash_from_other_cost_still_verifies() {
        let stronger = Argon2PasswordService::with_config(Argon2Config {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();

        let hash = cheap().hash("pw1").await.unwrap();

        assert!(stronger.verify("pw1", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_decoy_uses_configured_cost() {
        let service = cheap();

        assert!(service.decoy_hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
        service.verify_decoy("anything").await.unwrap();
    }

    #[test]
    fn test_with_config_rejects_invalid_cost() {
        let result = Argon2PasswordService::with_config(Argon2Config {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });

        assert!(matches!(result, Err(AuthError::HashingError(_))));
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_hash() {
        let result = cheap().verify("pw1", "not-a-phc-string").await;

        assert!(matches!(result, Err(AuthError::HashingError(_))));
    }
}
