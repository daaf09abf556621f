//! Services wired over the in-memory store with real hashing and tokens.
#![cfg(feature = "auth")]

use std::sync::Arc;

use scribe_core::domain::{PageRequest, PostDraft, Registration, User};
use scribe_core::ports::{PasswordService, TokenService, UserRepository};
use scribe_core::{AuthService, DomainError, PostService, UserService};
use scribe_infra::{
    Argon2Config, Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService,
};

struct Harness {
    store: Arc<InMemoryStore>,
    users: UserService,
    auth: AuthService,
    posts: PostService,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let passwords: Arc<dyn PasswordService> = Arc::new(
        Argon2PasswordService::with_config(Argon2Config {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap(),
    );
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "integration-test-secret-0123456789abcdef".to_string(),
        ..JwtConfig::default()
    }));

    let users = UserService::new(store.clone(), passwords.clone());
    let auth = AuthService::new(users.clone(), passwords, tokens);
    let posts = PostService::new(store.clone());

    Harness {
        store,
        users,
        auth,
        posts,
    }
}

async fn register(h: &Harness, email: &str, password: &str) -> User {
    let registration = Registration::new(email, password, "Ada", "Lovelace").unwrap();
    h.users.register(registration).await.unwrap()
}

#[tokio::test]
async fn duplicate_email_is_rejected_without_second_record() {
    let h = harness();
    let first = register(&h, "a@x.com", "pw1").await;

    let again = Registration::new("A@X.com", "other", "Bob", "Smith").unwrap();
    let result = h.users.register(again).await;

    assert!(matches!(result, Err(DomainError::DuplicateEmail(_))));
    let stored = h.store.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(stored.id, first.id);
    assert_eq!(stored.first_name, "Ada");
}

#[tokio::test]
async fn password_is_stored_hashed() {
    let h = harness();

    let user = register(&h, "a@x.com", "pw1").await;

    assert_ne!(user.password_hash, "pw1");
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn login_token_resolves_to_same_user() {
    let h = harness();
    let user = register(&h, "a@x.com", "pw1").await;

    let session = h.auth.login("a@x.com", "pw1").await.unwrap();
    let current = h.auth.current_user(&session.token).await.unwrap();

    assert_eq!(session.user.id, user.id);
    assert_eq!(current, user);
    assert_eq!(session.expires_in, 24 * 3600);
}

#[tokio::test]
async fn login_with_wrong_password_or_unknown_email_fails() {
    let h = harness();
    register(&h, "a@x.com", "pw1").await;

    let wrong_password = h.auth.login("a@x.com", "pw2").await;
    let unknown_email = h.auth.login("nobody@x.com", "pw1").await;

    assert!(matches!(wrong_password, Err(DomainError::InvalidCredentials)));
    assert!(matches!(unknown_email, Err(DomainError::InvalidCredentials)));
}

#[tokio::test]
async fn garbage_token_is_unauthenticated() {
    let h = harness();

    let result = h.auth.current_user("not.a.jwt").await;

    assert!(matches!(result, Err(DomainError::Unauthenticated(_))));
}

#[tokio::test]
async fn token_for_unknown_user_is_unauthenticated() {
    let h = harness();
    let tokens = JwtTokenService::new(JwtConfig {
        secret: "integration-test-secret-0123456789abcdef".to_string(),
        ..JwtConfig::default()
    });
    let token = tokens.generate_token(404, "ghost@x.com").unwrap();

    let result = h.auth.current_user(&token).await;

    assert!(matches!(result, Err(DomainError::Unauthenticated(_))));
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let h = harness();
    let author = register(&h, "a@x.com", "pw1").await;

    let created = h
        .posts
        .create(PostDraft::new("T", "C").unwrap(), &author)
        .await
        .unwrap();
    let fetched = h.posts.get_by_id(created.post.id).await.unwrap();

    assert_eq!(fetched.post.title, "T");
    assert_eq!(fetched.post.content, "C");
    assert_eq!(fetched.post.author_id, author.id);
    assert_eq!(fetched.author.email, "a@x.com");
    assert_eq!(fetched.post.created_at, fetched.post.updated_at);
}

#[tokio::test]
async fn non_author_cannot_update_or_delete() {
    let h = harness();
    let author = register(&h, "a@x.com", "pw1").await;
    let intruder = register(&h, "b@x.com", "pw2").await;
    let created = h
        .posts
        .create(PostDraft::new("T", "C").unwrap(), &author)
        .await
        .unwrap();
    let id = created.post.id;

    let update = h
        .posts
        .update(id, PostDraft::new("T2", "C2").unwrap(), &intruder)
        .await;
    let delete = h.posts.delete(id, &intruder).await;

    assert!(matches!(update, Err(DomainError::Forbidden(_))));
    assert!(matches!(delete, Err(DomainError::Forbidden(_))));
    let unchanged = h.posts.get_by_id(id).await.unwrap();
    assert_eq!(unchanged.post, created.post);
}

#[tokio::test]
async fn author_update_keeps_author() {
    let h = harness();
    let author = register(&h, "a@x.com", "pw1").await;
    let created = h
        .posts
        .create(PostDraft::new("T", "C").unwrap(), &author)
        .await
        .unwrap();

    let updated = h
        .posts
        .update(created.post.id, PostDraft::new("T2", "C2").unwrap(), &author)
        .await
        .unwrap();

    assert_eq!(updated.post.title, "T2");
    assert_eq!(updated.post.content, "C2");
    assert_eq!(updated.author.id, author.id);
    assert_eq!(updated.post.created_at, created.post.created_at);
    assert!(updated.post.updated_at >= created.post.updated_at);
}

#[tokio::test]
async fn missing_post_is_not_found_for_every_operation() {
    let h = harness();
    let user = register(&h, "a@x.com", "pw1").await;

    let get = h.posts.get_by_id(1).await;
    let update = h
        .posts
        .update(1, PostDraft::new("T", "C").unwrap(), &user)
        .await;
    let delete = h.posts.delete(1, &user).await;

    assert!(matches!(get, Err(DomainError::NotFound { .. })));
    assert!(matches!(update, Err(DomainError::NotFound { .. })));
    assert!(matches!(delete, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn listing_returns_newest_first() {
    let h = harness();
    let author = register(&h, "a@x.com", "pw1").await;
    for title in ["P1", "P2", "P3"] {
        h.posts
            .create(PostDraft::new(title, "body").unwrap(), &author)
            .await
            .unwrap();
    }

    let page = h.posts.list(PageRequest::default()).await.unwrap();

    let titles: Vec<_> = page.items.iter().map(|p| p.post.title.as_str()).collect();
    assert_eq!(titles, ["P3", "P2", "P1"]);
    assert_eq!(page.total_items, 3);
}
